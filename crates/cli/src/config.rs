//! CLI configuration utilities

use std::path::{Path, PathBuf};

use anyhow::Result;
use depot_core::{ClientConfig, ContextId, ValidateConfig};
use directories::ProjectDirs;
use tracing::debug;

/// `config.toml` in the platform config directory, if it exists
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "depot")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .filter(|path| path.exists())
}

/// Load configuration and apply command line overrides
pub fn load_config(
    path: Option<&Path>,
    base_url: Option<String>,
    warehouse: Option<ContextId>,
) -> Result<ClientConfig> {
    let path = path.map(Path::to_path_buf).or_else(default_config_path);
    if let Some(path) = &path {
        debug!("Loading configuration from: {}", path.display());
    }

    let config = ClientConfig::load(path.as_deref())?;
    let config = apply_overrides(config, base_url, warehouse);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(
    mut config: ClientConfig,
    base_url: Option<String>,
    warehouse: Option<ContextId>,
) -> ClientConfig {
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    if let Some(warehouse) = warehouse {
        config.warehouse_id = Some(warehouse.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_loaded_values() {
        let config = apply_overrides(
            ClientConfig::default(),
            Some("https://wms.example.com".into()),
            Some(ContextId::from("7")),
        );
        assert_eq!(config.base_url, "https://wms.example.com");
        assert_eq!(config.warehouse_id.as_deref(), Some("7"));
    }

    #[test]
    fn no_overrides_keeps_config() {
        let config = apply_overrides(ClientConfig::default(), None, None);
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn invalid_override_fails_validation() {
        let config = apply_overrides(ClientConfig::default(), Some("nope".into()), None);
        assert!(config.validate().is_err());
    }
}
