//! Authority Signals - deterministic judgment over generated content packs.
//!
//! This crate provides:
//! - Topic indexing over extracted insights or a core thesis
//! - The insight guard that flags claims with no grounding
//! - Authority consistency scoring of a pack against the author's profile
//! - The weakness radar over a user's recent packs, with a TTL cache
//!
//! Scoring is pure and synchronous. Only [`radar::RadarService`] performs I/O,
//! through the [`radar::PackHistory`] and [`radar::SessionResolver`] seams.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod consistency;
pub mod guard;
pub mod model;
pub mod radar;
pub mod text;
pub mod topics;

pub use consistency::calculate_authority_consistency;
pub use guard::{validate_asset_content, AssetValidation, InsightGuard};
pub use model::{
    AuthorityConsistency, AuthorityProfileContext, CoreThesis, MessagingStrength, PackRecord,
    StrategicAuthorityMap, StrategicClaim, Tone, ToneSetting,
};
pub use radar::{
    compute_weakness_radar, InMemoryRadarCache, IssueId, RadarCache, RadarOutcome, RadarService,
    Severity, WeaknessRadar, WeaknessRadarIssue,
};
pub use topics::{
    build_insight_topic_index, build_thesis_topic_index, section_aligns_with_topics, InsightFields,
    TopicIndex,
};
