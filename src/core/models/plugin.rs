use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::FlexPluginsError;

/// Accepted wherever a configuration SID is, meaning the released configuration.
pub const ACTIVE_CONFIGURATION: &str = "active";

/// Whether `id` looks like a configuration SID.
pub fn is_configuration_sid(id: &str) -> bool {
    id.starts_with("FJ")
}

/// A plugin as shown by `list plugins`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSummary {
    pub sid: String,
    pub name: String,
    pub friendly_name: String,
    pub description: String,
    pub is_active: bool,
    pub date_created: DateTime<Utc>,
}

/// A plugin version as shown by `list plugin-versions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginVersionSummary {
    pub sid: String,
    pub plugin_sid: String,
    pub version: String,
    pub url: String,
    pub changelog: String,
    pub is_private: bool,
    pub is_active: bool,
    pub date_created: DateTime<Utc>,
}

/// A configuration as shown by `list configurations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSummary {
    pub sid: String,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub date_created: DateTime<Utc>,
}

/// A freshly created configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub sid: String,
    pub name: String,
    pub description: String,
    pub plugins: Vec<PluginVersionRef>,
    pub date_created: DateTime<Utc>,
}

/// A release pointing at the configuration served to end users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub sid: String,
    pub configuration_sid: String,
    pub date_created: DateTime<Utc>,
}

/// Everything the Plugins API needs to register an uploaded bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployRequest {
    pub name: String,
    pub url: String,
    pub version: semver::Version,
    pub changelog: String,
    pub description: String,
    pub is_private: bool,
}

/// Identifiers returned once a plugin version is registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedPlugin {
    pub plugin_sid: String,
    pub plugin_version_sid: String,
    pub name: String,
    pub version: String,
}

/// Output of the `deploy` build script: where the bundle was uploaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResult {
    pub plugin_url: String,
    #[serde(default)]
    pub service_sid: Option<String>,
    #[serde(default)]
    pub domain_name: Option<String>,
}

/// A `name@version` reference to a plugin version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginVersionRef {
    pub name: String,
    pub version: String,
}

impl FromStr for PluginVersionRef {
    type Err = FlexPluginsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FlexPluginsError::InvalidArgument {
            detail: format!("'{s}' must be of the form name@version, e.g. plugin-sample@1.0.0"),
        };
        let (name, version) = s.rsplit_once('@').ok_or_else(invalid)?;
        if name.is_empty() || version.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
        })
    }
}

impl fmt::Display for PluginVersionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_sids_use_fj_prefix() {
        assert!(is_configuration_sid("FJ00000000000000000000000000000001"));
        assert!(!is_configuration_sid("FP00000000000000000000000000000001"));
        assert!(!is_configuration_sid(""));
    }

    #[test]
    fn parses_name_and_version() {
        let r: PluginVersionRef = "plugin-sample@1.2.3".parse().unwrap();
        assert_eq!(r.name, "plugin-sample");
        assert_eq!(r.version, "1.2.3");
        assert_eq!(r.to_string(), "plugin-sample@1.2.3");
    }

    #[test]
    fn scoped_names_split_on_last_at() {
        let r: PluginVersionRef = "@acme/plugin@2.0.0".parse().unwrap();
        assert_eq!(r.name, "@acme/plugin");
        assert_eq!(r.version, "2.0.0");
    }

    #[test]
    fn rejects_missing_version() {
        assert!("plugin-sample".parse::<PluginVersionRef>().is_err());
        assert!("plugin-sample@".parse::<PluginVersionRef>().is_err());
        assert!("@1.0.0".parse::<PluginVersionRef>().is_err());
    }

    #[test]
    fn deploy_result_deserializes_script_output() {
        let json = r#"{"pluginUrl":"https://x.twil.io/plugins/p/1.0.0/bundle.js","serviceSid":"ZS1"}"#;
        let result: DeployResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.plugin_url, "https://x.twil.io/plugins/p/1.0.0/bundle.js");
        assert_eq!(result.service_sid.as_deref(), Some("ZS1"));
        assert!(result.domain_name.is_none());
    }
}
