//! Configuration validation support

use config::ConfigError;
use serde::{Deserialize, Serialize};

/// Trait for validating configuration values
pub trait ValidateConfig: Serialize + for<'de> Deserialize<'de> {
    /// Validate the configuration
    ///
    /// Returns Ok(()) if valid, or an error describing what's wrong
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Common validation helpers
pub mod validators {
    use config::ConfigError;

    /// Validate that a string is not empty
    pub fn validate_not_empty(value: &str, field: &str) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::Message(format!("{field}: cannot be empty")));
        }
        Ok(())
    }

    /// Validate URL format
    pub fn validate_url(url: &str, field: &str) -> Result<(), ConfigError> {
        url::Url::parse(url)
            .map_err(|e| ConfigError::Message(format!("{field}: invalid URL - {e}")))?;
        Ok(())
    }

    /// Validate that a value is within range
    pub fn validate_range<T: PartialOrd + std::fmt::Display>(
        value: T,
        min: T,
        max: T,
        field: &str,
    ) -> Result<(), ConfigError> {
        if value < min || value > max {
            return Err(ConfigError::Message(format!(
                "{field}: must be between {min} and {max}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validators::*;

    #[test]
    fn not_empty_rejects_whitespace() {
        assert!(validate_not_empty("   ", "login_path").is_err());
        assert!(validate_not_empty("login.html", "login_path").is_ok());
    }

    #[test]
    fn url_must_parse() {
        assert!(validate_url("http://localhost/wms", "base_url").is_ok());
        let err = validate_url("api/products_api.php", "base_url").unwrap_err();
        assert!(err.to_string().starts_with("base_url: invalid URL"));
    }

    #[test]
    fn range_is_inclusive() {
        assert!(validate_range(0u64, 0, 60_000, "delay").is_ok());
        assert!(validate_range(60_000u64, 0, 60_000, "delay").is_ok());
        assert!(validate_range(60_001u64, 0, 60_000, "delay").is_err());
    }
}
