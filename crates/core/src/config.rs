//! Client configuration
//!
//! Values are layered: built-in defaults, then an optional config file
//! (TOML, YAML or JSON), then `DEPOT_*` environment variables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::validation::{ValidateConfig, validators};

/// Environment variable prefix, e.g. `DEPOT_BASE_URL`
pub const ENV_PREFIX: &str = "DEPOT";

/// Endpoint used for login, logout and session checks
pub const AUTH_ENDPOINT: &str = "api/auth_api.php";

/// Endpoint listing the warehouses available to the current user
pub const WAREHOUSE_LIST_ENDPOINT: &str = "api/warehouses_api.php?action=list";

/// Upper bound for the unauthorized redirect delay
pub const MAX_UNAUTHORIZED_DELAY_MS: u64 = 60_000;

/// Request client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for relative endpoint paths
    pub base_url: String,

    /// Warehouse selected at startup
    pub warehouse_id: Option<String>,

    /// Transport timeout in seconds; unset leaves the transport default
    pub timeout_secs: Option<u64>,

    /// User agent sent with every request
    pub user_agent: String,

    /// Delay before the unauthorized hook fires after a 401
    pub unauthorized_delay_ms: u64,

    /// Login entry point handed to the unauthorized hook
    pub login_path: String,

    /// URL fragments that never receive the warehouse context
    pub exempt_endpoints: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/wms".to_string(),
            warehouse_id: None,
            timeout_secs: None,
            user_agent: concat!("depot-client/", env!("CARGO_PKG_VERSION")).to_string(),
            unauthorized_delay_ms: 2000,
            login_path: "login.html".to_string(),
            exempt_endpoints: vec![
                AUTH_ENDPOINT.to_string(),
                WAREHOUSE_LIST_ENDPOINT.to_string(),
            ],
        }
    }
}

impl ValidateConfig for ClientConfig {
    fn validate(&self) -> Result<(), config::ConfigError> {
        validators::validate_url(&self.base_url, "base_url")?;
        validators::validate_not_empty(&self.user_agent, "user_agent")?;
        validators::validate_not_empty(&self.login_path, "login_path")?;
        validators::validate_range(
            self.unauthorized_delay_ms,
            0,
            MAX_UNAUTHORIZED_DELAY_MS,
            "unauthorized_delay_ms",
        )?;
        if let Some(warehouse) = &self.warehouse_id {
            validators::validate_not_empty(warehouse, "warehouse_id")?;
        }
        Ok(())
    }
}

impl ClientConfig {
    /// Load configuration from an optional file plus the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration fails validation
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        Self::load_with_env(path, None)
    }

    /// Load configuration, reading environment overrides from `env` instead of
    /// the process environment when given
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::load`]
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> CoreResult<Self> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("user_agent", defaults.user_agent)?
            .set_default("unauthorized_delay_ms", defaults.unauthorized_delay_ms)?
            .set_default("login_path", defaults.login_path)?
            .set_default("exempt_endpoints", defaults.exempt_endpoints)?;

        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
        }

        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("exempt_endpoints")
            .source(env);

        let config: Self = builder.add_source(environment).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use std::io::Write;

    fn empty_env() -> Option<config::Map<String, String>> {
        Some(config::Map::new())
    }

    #[test]
    fn defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.unauthorized_delay_ms, 2000);
        assert!(config.timeout_secs.is_none());
        assert_eq!(
            config.exempt_endpoints,
            vec![AUTH_ENDPOINT, WAREHOUSE_LIST_ENDPOINT]
        );
    }

    #[test]
    fn load_without_sources_gives_defaults() {
        let config = ClientConfig::load_with_env(None, empty_env()).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
base_url = "https://wms.example.com/app"
warehouse_id = "7"
timeout_secs = 15
login_path = "index.html"
"#
        )
        .unwrap();

        let config = ClientConfig::load_with_env(Some(file.path()), empty_env()).unwrap();
        assert_eq!(config.base_url, "https://wms.example.com/app");
        assert_eq!(config.warehouse_id.as_deref(), Some("7"));
        assert_eq!(config.timeout_secs, Some(15));
        assert_eq!(config.login_path, "index.html");
        assert_eq!(config.unauthorized_delay_ms, 2000);
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, r#"base_url = "https://wms.example.com/app""#).unwrap();

        let mut env = config::Map::new();
        env.insert(
            "DEPOT_BASE_URL".to_string(),
            "https://staging.example.com".to_string(),
        );
        env.insert("DEPOT_UNAUTHORIZED_DELAY_MS".to_string(), "500".to_string());

        let config = ClientConfig::load_with_env(Some(file.path()), Some(env)).unwrap();
        assert_eq!(config.base_url, "https://staging.example.com");
        assert_eq!(config.unauthorized_delay_ms, 500);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let mut env = config::Map::new();
        env.insert("DEPOT_BASE_URL".to_string(), "not a url".to_string());

        let result = ClientConfig::load_with_env(None, Some(env));
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn delay_above_limit_is_rejected() {
        let config = ClientConfig {
            unauthorized_delay_ms: MAX_UNAUTHORIZED_DELAY_MS + 1,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
