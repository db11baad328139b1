//! Authority Common - shared error types, logging, and configuration.
//!
//! This crate provides:
//! - The engine error type and status code mapping
//! - Logging setup and the request context used by request-scoped calls
//! - Configuration types, loading, and validation
//! - Small utility functions

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod util;
pub mod validation;

pub use config::{Config, GuardConfig, ObservabilityConfig, RadarConfig};
pub use error::{Error, Result, ResultExt};
pub use logging::{init_logging, RequestContext};
pub use validation::{Validate, ValidationError, ValidationResult};
