use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One field-level comparison between two configuration snapshots.
///
/// `before` and `after` are opaque values; a JSON `null` and a missing
/// field both deserialize to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Difference {
    pub path: String,
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub after: Option<Value>,
    pub has_diff: bool,
}

impl Difference {
    /// Entry comparing two optional values; `has_diff` is derived.
    pub fn compare(path: &str, before: Option<Value>, after: Option<Value>) -> Self {
        let has_diff = before != after;
        Self {
            path: path.to_string(),
            before,
            after,
            has_diff,
        }
    }
}

/// Result of diffing two configurations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationsDiff {
    pub configuration: Vec<Difference>,
    pub plugins: BTreeMap<String, Vec<Difference>>,
}

/// How a plugin changed between two configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginChange {
    Added,
    Removed,
    Modified,
}
