//! Configuration loading and management

use std::path::Path;

use anyhow::{Context, Result};
use oauth_flow::{AdminConfig, ClientConfig};
use serde::{Deserialize, Serialize};

/// Main configuration for the reference app
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// OAuth client registration used for the code exchange
    #[serde(default)]
    pub oauth: ClientConfig,

    /// Hydra admin API location
    #[serde(default)]
    pub hydra: AdminConfig,
}

impl Config {
    /// Load configuration from the config directory
    pub fn load(config_path: &str) -> Result<Self> {
        let config_file = Path::new(config_path).join("config.json");

        if config_file.exists() {
            let content = std::fs::read_to_string(&config_file)
                .with_context(|| format!("Failed to read config file: {:?}", config_file))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| "Failed to parse config.json")?;
            tracing::info!("Loaded configuration from {:?}", config_file);
            Ok(config)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_file
            );
            let config = Config::default();

            std::fs::create_dir_all(config_path)
                .with_context(|| format!("Failed to create config directory: {}", config_path))?;

            // Write default config for reference
            let content = serde_json::to_string_pretty(&config)?;
            std::fs::write(&config_file, content)
                .with_context(|| format!("Failed to write default config: {:?}", config_file))?;
            tracing::info!("Created default config at {:?}", config_file);

            Ok(config)
        }
    }

    /// Apply credentials given on the command line or via the environment.
    /// Values that are not given keep whatever the file had.
    pub fn with_credentials(
        mut self,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Self {
        if client_id.is_some() {
            self.oauth.client_id = client_id;
        }
        if client_secret.is_some() {
            self.oauth.client_secret = client_secret;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("nested");
        let config_path = config_path.to_str().unwrap();

        let config = Config::load(config_path).unwrap();

        assert!(config.oauth.client_id().is_none());
        assert_eq!(config.oauth.redirect_uri.as_str(), "http://127.0.0.1:8080/callback");
        assert!(Path::new(config_path).join("config.json").exists());

        // The written file loads back to the same settings
        let reloaded = Config::load(config_path).unwrap();
        assert_eq!(reloaded.hydra.admin_url, config.hydra.admin_url);
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{
                "oauth": {
                    "client_id": "reference-app",
                    "client_secret": "s3cret",
                    "token_endpoint": "https://hydra.example.com/oauth2/token"
                },
                "hydra": { "admin_url": "https://hydra-admin.example.com" }
            }"#,
        )
        .unwrap();

        let config = Config::load(dir.path().to_str().unwrap()).unwrap();

        assert_eq!(config.oauth.client_id(), Some("reference-app"));
        assert_eq!(config.oauth.client_secret(), Some("s3cret"));
        assert_eq!(
            config.oauth.token_endpoint.as_str(),
            "https://hydra.example.com/oauth2/token"
        );
        assert_eq!(
            config.oauth.redirect_uri.as_str(),
            "http://127.0.0.1:8080/callback"
        );
        assert_eq!(
            config.hydra.admin_url.as_str(),
            "https://hydra-admin.example.com/"
        );
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{ oauth: ").unwrap();

        assert!(Config::load(dir.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_cli_credentials_override_file() {
        let mut config = Config::default();
        config.oauth.client_id = Some("from-file".to_string());
        config.oauth.client_secret = Some("file-secret".to_string());

        let config = config.with_credentials(Some("from-cli".to_string()), None);

        assert_eq!(config.oauth.client_id(), Some("from-cli"));
        assert_eq!(config.oauth.client_secret(), Some("file-secret"));
    }
}
