use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `/Plugins` resource as returned by the Flex Plugins API.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginResource {
    pub sid: String,
    pub unique_name: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
    pub date_created: DateTime<Utc>,
}

/// `/Plugins/{name}/Versions` resource.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginVersionResource {
    pub sid: String,
    pub plugin_sid: String,
    pub version: String,
    pub plugin_url: String,
    #[serde(default)]
    pub changelog: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub archived: bool,
    pub date_created: DateTime<Utc>,
}

/// `/Configurations` resource.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigurationResource {
    pub sid: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
    pub date_created: DateTime<Utc>,
}

/// `/Configurations/{sid}/Plugins` resource: a plugin version pinned by a
/// configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfiguredPluginResource {
    pub plugin_sid: String,
    pub plugin_version_sid: String,
    pub unique_name: String,
    pub version: String,
    pub plugin_url: String,
    #[serde(default)]
    pub phase: i64,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub changelog: Option<String>,
}

/// `/Releases` resource.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseResource {
    pub sid: String,
    pub configuration_sid: String,
    pub date_created: DateTime<Utc>,
}

/// Pagination block shared by every list response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub next_page_url: Option<String>,
}

/// Error body returned by Twilio APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
}
