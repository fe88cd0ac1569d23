use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::adapters::api::resources::{ConfigurationResource, ConfiguredPluginResource};
use crate::core::models::difference::{ConfigurationsDiff, Difference};

/// A configuration together with the plugin versions it pins.
#[derive(Debug, Clone)]
pub struct ConfigurationSnapshot {
    pub configuration: ConfigurationResource,
    pub plugins: Vec<ConfiguredPluginResource>,
}

/// Comparable fields of a configuration, in display order.
fn configuration_fields(config: &ConfigurationResource) -> Vec<(&'static str, Value)> {
    vec![
        ("sid", json!(config.sid)),
        ("name", json!(config.name)),
        (
            "description",
            json!(config.description.clone().unwrap_or_default()),
        ),
        ("dateCreated", json!(config.date_created.to_rfc3339())),
    ]
}

/// Comparable fields of a configured plugin, in display order.
fn plugin_fields(plugin: &ConfiguredPluginResource) -> Vec<(&'static str, Value)> {
    vec![
        ("name", json!(plugin.unique_name)),
        ("pluginSid", json!(plugin.plugin_sid)),
        ("pluginVersionSid", json!(plugin.plugin_version_sid)),
        ("version", json!(plugin.version)),
        ("url", json!(plugin.plugin_url)),
        ("phase", json!(plugin.phase)),
        ("isPrivate", json!(plugin.private)),
        ("changelog", json!(plugin.changelog.clone().unwrap_or_default())),
    ]
}

fn compare_fields(
    before: Option<Vec<(&'static str, Value)>>,
    after: Option<Vec<(&'static str, Value)>>,
) -> Vec<Difference> {
    match (before, after) {
        (Some(before), Some(after)) => before
            .into_iter()
            .zip(after)
            .map(|((path, b), (_, a))| Difference::compare(path, Some(b), Some(a)))
            .collect(),
        (Some(before), None) => before
            .into_iter()
            .map(|(path, b)| Difference::compare(path, Some(b), None))
            .collect(),
        (None, Some(after)) => after
            .into_iter()
            .map(|(path, a)| Difference::compare(path, None, Some(a)))
            .collect(),
        (None, None) => Vec::new(),
    }
}

/// Field-level diff of two configuration snapshots.
///
/// Plugins present on one side only yield entries whose other side is
/// absent, so they classify as added or removed.
pub fn diff_snapshots(old: &ConfigurationSnapshot, new: &ConfigurationSnapshot) -> ConfigurationsDiff {
    let configuration = compare_fields(
        Some(configuration_fields(&old.configuration)),
        Some(configuration_fields(&new.configuration)),
    );

    let old_plugins: BTreeMap<&str, &ConfiguredPluginResource> = old
        .plugins
        .iter()
        .map(|p| (p.unique_name.as_str(), p))
        .collect();
    let new_plugins: BTreeMap<&str, &ConfiguredPluginResource> = new
        .plugins
        .iter()
        .map(|p| (p.unique_name.as_str(), p))
        .collect();

    let mut names: Vec<&str> = old_plugins.keys().chain(new_plugins.keys()).copied().collect();
    names.sort_unstable();
    names.dedup();

    let plugins = names
        .into_iter()
        .map(|name| {
            let before = old_plugins.get(name).map(|p| plugin_fields(p));
            let after = new_plugins.get(name).map(|p| plugin_fields(p));
            (name.to_string(), compare_fields(before, after))
        })
        .collect();

    ConfigurationsDiff {
        configuration,
        plugins,
    }
}
