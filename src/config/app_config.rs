use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::adapters::api::http_toolkit::DEFAULT_BASE_URL;
use crate::core::errors::{FlexPluginsError, Result};

/// Top-level configuration read from `config.toml`.
///
/// Every section is optional; a missing file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub credentials: CredentialsSection,
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub start: StartSection,
    #[serde(default)]
    pub scripts: ScriptsSection,
}

impl AppConfig {
    /// Load the configuration from `path`, or the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| FlexPluginsError::InvalidConfig {
            detail: format!("Failed to parse {}: {e}", path.display()),
        })?;

        if config.api.timeout_secs == 0 {
            return Err(FlexPluginsError::InvalidConfig {
                detail: "[api] timeout_secs must be greater than zero".into(),
            });
        }

        Ok(config)
    }

    /// Default location: `{config_dir}/flex-plugins/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flex-plugins")
            .join("config.toml")
    }

    /// Resolve credentials, preferring explicit values (flags or environment)
    /// over the `[credentials]` section.
    pub fn credentials(
        &self,
        account_sid: Option<&str>,
        auth_token: Option<&str>,
    ) -> Option<Credentials> {
        let account_sid = account_sid
            .map(str::to_string)
            .or_else(|| self.credentials.account_sid.clone())?;
        let auth_token = auth_token
            .map(str::to_string)
            .or_else(|| self.credentials.auth_token.clone())?;
        Some(Credentials {
            account_sid,
            auth_token,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

/// The `[credentials]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsSection {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
}

/// The `[api]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// The `[start]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StartSection {
    /// First port tried for local plugin dev servers.
    #[serde(default = "default_port")]
    pub default_port: u16,
}

impl Default for StartSection {
    fn default() -> Self {
        Self {
            default_port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

/// The `[scripts]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptsSection {
    /// npx binary used to run the plugin build scripts.
    #[serde(default = "default_npx_path")]
    pub npx_path: PathBuf,
}

impl Default for ScriptsSection {
    fn default() -> Self {
        Self {
            npx_path: default_npx_path(),
        }
    }
}

fn default_npx_path() -> PathBuf {
    PathBuf::from("npx")
}

/// Account credentials used for HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account_sid: String,
    pub auth_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"***")
            .finish()
    }
}
