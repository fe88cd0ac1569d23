use crate::cli::commands::print_helpers::{
    print_header, print_pretty, print_title, print_version, sort_by_active, to_json,
};
use crate::cli::context::CommandContext;
use crate::core::errors::{FlexPluginsError, Result};
use crate::core::models::plugin::{ConfigurationSummary, PluginSummary, PluginVersionSummary};
use crate::core::traits::logger::Logger;
use crate::core::traits::toolkit::PluginsApiToolkit;

/// Resource listed by `flex-plugins list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListTarget {
    Plugins,
    PluginVersions { name: String },
    Configurations,
}

/// Execute the `flex-plugins list` command.
pub fn execute(target: &ListTarget, ctx: &CommandContext) -> Result<()> {
    let toolkit = ctx.toolkit()?;
    if ctx.json {
        println!("{}", render_json(target, &toolkit)?);
        return Ok(());
    }
    run(target, &toolkit, ctx.logger())
}

/// Fetch `target` as pretty JSON. An unknown plugin has an empty version list.
pub fn render_json(target: &ListTarget, toolkit: &dyn PluginsApiToolkit) -> Result<String> {
    match target {
        ListTarget::Plugins => to_json(&toolkit.list_plugins()?),
        ListTarget::PluginVersions { name } => {
            to_json(&plugin_versions(toolkit, name)?.unwrap_or_default())
        }
        ListTarget::Configurations => to_json(&toolkit.list_configurations()?),
    }
}

/// Fetch and print `target` through the given collaborators.
pub fn run(target: &ListTarget, toolkit: &dyn PluginsApiToolkit, logger: &dyn Logger) -> Result<()> {
    match target {
        ListTarget::Plugins => print_plugins(&toolkit.list_plugins()?, logger),
        ListTarget::PluginVersions { name } => match plugin_versions(toolkit, name)? {
            Some(versions) => print_plugin_versions(name, versions, logger),
            None => logger.info(&format!("!!Plugin **{name}** was not found.!!")),
        },
        ListTarget::Configurations => print_configurations(toolkit.list_configurations()?, logger),
    }
    Ok(())
}

/// Versions of `name`, `None` when the plugin does not exist.
fn plugin_versions(
    toolkit: &dyn PluginsApiToolkit,
    name: &str,
) -> Result<Option<Vec<PluginVersionSummary>>> {
    match toolkit.list_plugin_versions(name) {
        Ok(versions) => Ok(Some(versions)),
        Err(FlexPluginsError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

fn print_plugins(plugins: &[PluginSummary], logger: &dyn Logger) {
    if plugins.is_empty() {
        logger.info("!!No plugins were found.!!");
        return;
    }

    let print = |plugin: &PluginSummary| {
        print_title(logger, &plugin.name);
        print_pretty(logger, plugin, &["isActive", "name"]);
        logger.newline();
    };

    print_header(logger, "Active Plugins", None);
    plugins.iter().filter(|p| p.is_active).for_each(print);
    logger.newline();
    print_header(logger, "InActive Plugins", None);
    plugins.iter().filter(|p| !p.is_active).for_each(print);
}

fn print_plugin_versions(name: &str, mut versions: Vec<PluginVersionSummary>, logger: &dyn Logger) {
    sort_by_active(&mut versions, |v| v.is_active);

    print_header(logger, "Plugin Name", Some(name));
    if let Some(first) = versions.first() {
        print_header(logger, "Plugin SID", Some(first.plugin_sid.as_str()));
    }
    logger.newline();

    print_header(logger, "Versions", None);
    for version in &versions {
        print_version(logger, &version.version, if version.is_active { "(Active)" } else { "" });
        print_pretty(logger, version, &["isActive", "pluginSid", "version"]);
        logger.newline();
    }
}

fn print_configurations(mut configurations: Vec<ConfigurationSummary>, logger: &dyn Logger) {
    if configurations.is_empty() {
        logger.info("!!No configurations were found.!!");
        return;
    }
    sort_by_active(&mut configurations, |c| c.is_active);

    print_header(logger, "Configurations", None);
    for configuration in &configurations {
        let note = if configuration.is_active { " (Active)" } else { "" };
        logger.info(&format!("**{}**{note}", configuration.sid));
        print_pretty(logger, configuration, &["isActive", "sid"]);
        logger.newline();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeToolkit, RecordingLogger, date};

    fn plugin(name: &str, active: bool) -> PluginSummary {
        PluginSummary {
            sid: format!("FP-{name}"),
            name: name.into(),
            friendly_name: name.into(),
            description: String::new(),
            is_active: active,
            date_created: date(),
        }
    }

    fn version(version: &str, active: bool) -> PluginVersionSummary {
        PluginVersionSummary {
            sid: format!("FV-{version}"),
            plugin_sid: "FP00000000000000000000000000000001".into(),
            version: version.into(),
            url: format!("https://x.twil.io/plugin-one/{version}/bundle.js"),
            changelog: String::new(),
            is_private: true,
            is_active: active,
            date_created: date(),
        }
    }

    #[test]
    fn plugins_split_by_active() {
        let toolkit = FakeToolkit {
            plugins: vec![plugin("inactive-one", false), plugin("active-one", true)],
            ..Default::default()
        };
        let logger = RecordingLogger::default();

        run(&ListTarget::Plugins, &toolkit, &logger).unwrap();

        let active_header = logger.position("Active Plugins").unwrap();
        let active = logger.position("**active-one**").unwrap();
        let inactive_header = logger.position("InActive Plugins").unwrap();
        let inactive = logger.position("**inactive-one**").unwrap();
        assert!(active_header < active && active < inactive_header && inactive_header < inactive);
        assert!(logger.contains("  Friendly Name: active-one"));
        assert!(logger.contains("  Date Created: Jan 10, 2020 20:00:00"));
        assert!(!logger.contains("Is Active"));
    }

    #[test]
    fn no_plugins_message() {
        let logger = RecordingLogger::default();
        run(&ListTarget::Plugins, &FakeToolkit::default(), &logger).unwrap();
        assert_eq!(logger.lines(), vec!["!!No plugins were found.!!"]);
    }

    #[test]
    fn plugin_versions_active_first() {
        let toolkit = FakeToolkit {
            versions: Some(vec![version("1.0.0", false), version("2.0.0", true)]),
            ..Default::default()
        };
        let logger = RecordingLogger::default();
        let target = ListTarget::PluginVersions {
            name: "plugin-one".into(),
        };

        run(&target, &toolkit, &logger).unwrap();

        let lines = logger.lines();
        assert_eq!(lines[0], "**Plugin Name:** plugin-one");
        assert_eq!(lines[1], "**Plugin SID:** FP00000000000000000000000000000001");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "**Versions:**");
        assert_eq!(lines[4], "**@2.0.0** (Active)");
        assert!(logger.position("**@1.0.0**").unwrap() > 4);
        assert!(!logger.contains("  Plugin SID:"));
        assert!(logger.contains("  Is Private: true"));
    }

    #[test]
    fn missing_plugin_is_reported_not_raised() {
        let logger = RecordingLogger::default();
        let target = ListTarget::PluginVersions {
            name: "ghost".into(),
        };

        run(&target, &FakeToolkit::default(), &logger).unwrap();

        assert_eq!(logger.lines(), vec!["!!Plugin **ghost** was not found.!!"]);
    }

    #[test]
    fn plugin_without_live_versions_still_prints_headers() {
        let toolkit = FakeToolkit {
            versions: Some(vec![]),
            ..Default::default()
        };
        let logger = RecordingLogger::default();
        let target = ListTarget::PluginVersions {
            name: "plugin-one".into(),
        };

        run(&target, &toolkit, &logger).unwrap();

        assert_eq!(
            logger.lines(),
            vec!["**Plugin Name:** plugin-one", "", "**Versions:**"]
        );
    }

    #[test]
    fn json_lists_configurations_with_camel_case_keys() {
        let toolkit = FakeToolkit {
            configurations: vec![ConfigurationSummary {
                sid: "FJ00000000000000000000000000000001".into(),
                name: "Autogenerated 1".into(),
                description: String::new(),
                is_active: true,
                date_created: date(),
            }],
            ..Default::default()
        };

        let json = render_json(&ListTarget::Configurations, &toolkit).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["sid"], "FJ00000000000000000000000000000001");
        assert_eq!(value[0]["isActive"], true);
        assert_eq!(toolkit.calls(), vec!["list_configurations"]);
    }

    #[test]
    fn json_for_missing_plugin_is_an_empty_list() {
        let target = ListTarget::PluginVersions {
            name: "ghost".into(),
        };
        let json = render_json(&target, &FakeToolkit::default()).unwrap();
        assert_eq!(json, "[]");
    }
}
