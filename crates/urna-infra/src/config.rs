//! Client configuration loader for Urna.
//!
//! Reads `config.toml` from the data directory and deserializes it into
//! [`ClientConfig`]. Falls back to defaults when the file is missing or
//! malformed.

use std::path::Path;

use urna_types::config::ClientConfig;

/// Load client configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Command-line overrides applied on top of the file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub scope: Option<String>,
}

/// Apply non-empty overrides to a loaded config.
pub fn apply_overrides(mut config: ClientConfig, overrides: &ConfigOverrides) -> ClientConfig {
    if let Some(base_url) = overrides.base_url.as_deref().filter(|s| !s.trim().is_empty()) {
        config.service.base_url = base_url.trim().to_string();
    }
    if let Some(scope) = overrides.scope.as_deref().filter(|s| !s.trim().is_empty()) {
        config.session.scope = scope.trim().to_string();
    }
    config
}
