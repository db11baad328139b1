//! Configuration validation.
//!
//! Checks that configured values are within ranges the engine can work with.

use thiserror::Error;

use crate::config::{Config, GuardConfig, ObservabilityConfig, RadarConfig};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["json", "pretty"];

impl Validate for Config {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors: Vec<ValidationError> = [
            self.radar.validate(),
            self.guard.validate(),
            self.observability.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

impl Config {
    /// Load configuration with env overrides, then validate it.
    pub fn load_and_validate() -> crate::Result<Self> {
        Self::load_with_env()?.into_validated()
    }

    /// Validate, reporting failures as [`crate::Error::Config`].
    pub fn into_validated(self) -> crate::Result<Self> {
        self.validate()
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        Ok(self)
    }
}

impl Validate for RadarConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.window_size == 0 {
            return Err(ValidationError::InvalidValue {
                field: "radar.window_size".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.cache_ttl_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "radar.cache_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.min_analyzed == 0 {
            return Err(ValidationError::InvalidValue {
                field: "radar.min_analyzed".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(())
    }
}

impl Validate for GuardConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.min_claim_chars == 0 {
            return Err(ValidationError::InvalidValue {
                field: "guard.min_claim_chars".into(),
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
            });
        }

        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of {}", LOG_FORMATS.join(", ")),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = Config::default();
        config.radar.window_size = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("radar.window_size"));
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = Config::default();
        config.observability.log_format = "xml".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut config = Config::default();
        config.radar.cache_ttl_secs = 0;
        config.guard.min_claim_chars = 0;

        match config.validate() {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config_surfaces_as_config_error() {
        let mut config = Config::default();
        config.radar.min_analyzed = 0;

        let err = config.into_validated().unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
        assert!(err.to_string().contains("radar.min_analyzed"));
        assert_eq!(err.status_code(), 500);

        assert!(Config::default().into_validated().is_ok());
    }
}
