//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the service URL, the credential backend and the last used
//! username.
//!
//! Configuration is stored at `~/.config/mnada/config.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_BASE_URL;
use crate::auth::{
    CredentialBackend, CredentialStore, FileCredentialStore, KeyringCredentialStore,
    MemoryCredentialStore,
};

/// Application name used for config/data directory paths
const APP_NAME: &str = "mnada";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment override for the service location
pub const API_URL_ENV: &str = "MNADA_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub last_username: Option<String>,
    #[serde(default)]
    pub credential_backend: CredentialBackend,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the credential slot and log files.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Open the credential store named by `credential_backend`.
    pub fn credential_store(&self) -> Result<Box<dyn CredentialStore + Send>> {
        let store: Box<dyn CredentialStore + Send> = match self.credential_backend {
            CredentialBackend::File => Box::new(FileCredentialStore::new(self.data_dir()?)),
            CredentialBackend::Keyring => Box::new(KeyringCredentialStore::new()),
            CredentialBackend::Memory => Box::new(MemoryCredentialStore::new()),
        };
        Ok(store)
    }

    /// Service location: environment first, then config, then the default.
    pub fn api_base_url(&self) -> String {
        Self::resolve_base_url(std::env::var(API_URL_ENV).ok(), self.api_base_url.as_deref())
    }

    fn resolve_base_url(env: Option<String>, configured: Option<&str>) -> String {
        env.filter(|v| !v.trim().is_empty())
            .or_else(|| configured.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_base_url_precedence() {
        assert_eq!(
            Config::resolve_base_url(Some("http://env".to_string()), Some("http://cfg")),
            "http://env"
        );
        assert_eq!(Config::resolve_base_url(None, Some("http://cfg")), "http://cfg");
        assert_eq!(
            Config::resolve_base_url(Some("  ".to_string()), Some("http://cfg")),
            "http://cfg"
        );
        assert_eq!(Config::resolve_base_url(None, None), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_config_parses_partial_file() {
        let config: Config = serde_json::from_str(r#"{"last_username":"ann"}"#).unwrap();
        assert_eq!(config.last_username.as_deref(), Some("ann"));
        assert_eq!(config.credential_backend, CredentialBackend::File);
        assert!(config.api_base_url.is_none());
    }

    #[test]
    fn test_memory_backend_store() {
        let config = Config {
            credential_backend: CredentialBackend::Memory,
            ..Config::default()
        };
        let store = config.credential_store().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.save("a.b.c").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("a.b.c"));
    }
}
