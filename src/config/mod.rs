//! Configuration management for circlet

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::git::VcsType;

/// Default API host
const DEFAULT_HOST: &str = "https://circleci.com";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API host; `CIRCLET_HOST` overrides at load time
    #[serde(default = "default_host")]
    pub host: String,

    /// CircleCI API token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Default organization name, used when git inference is unwanted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// Default VCS provider for the default organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcs_type: Option<VcsType>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            token: None,
            organization: None,
            vcs_type: None,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".circlet").join("config.yaml"))
    }

    /// Resolve the config path, honoring an explicit override
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration, honoring an explicit path override
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        let path = Self::resolve_path(path)?;
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let mut config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        if let Ok(host) = std::env::var("CIRCLET_HOST") {
            config.host = host;
        }

        Ok(config)
    }

    /// Save configuration, honoring an explicit path override
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        let path = Self::resolve_path(path)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // The file holds an API token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Validate that required configuration is present
    pub fn validate_auth(&self) -> Result<()> {
        if self.token.is_none() {
            return Err(ConfigError::MissingToken.into());
        }
        Ok(())
    }
}
