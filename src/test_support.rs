//! Test doubles for the command collaborators.

use std::cell::RefCell;

use chrono::{DateTime, Utc};

use crate::core::errors::{FlexPluginsError, Result};
use crate::core::models::difference::ConfigurationsDiff;
use crate::core::models::plugin::{
    Configuration, ConfigurationSummary, DeployRequest, DeployedPlugin, PluginSummary,
    PluginVersionSummary, Release,
};
use crate::core::traits::logger::Logger;
use crate::core::traits::script_runner::{ScriptCommand, ScriptRunner};
use crate::core::traits::toolkit::{CreateConfigurationRequest, PluginsApiToolkit};

pub const CREATED_CONFIGURATION_SID: &str = "FJ00000000000000000000000000000009";

pub fn date() -> DateTime<Utc> {
    "2020-01-10T20:00:00Z".parse().expect("valid test date")
}

/// Logger that keeps every message verbatim, markup included.
#[derive(Default)]
pub struct RecordingLogger {
    pub lines: RefCell<Vec<String>>,
}

impl RecordingLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|l| l.contains(needle))
    }

    pub fn position(&self, needle: &str) -> Option<usize> {
        self.lines.borrow().iter().position(|l| l.contains(needle))
    }
}

impl Logger for RecordingLogger {
    fn info(&self, msg: &str) {
        self.lines.borrow_mut().push(msg.to_string());
    }
    fn success(&self, msg: &str) {
        self.lines.borrow_mut().push(msg.to_string());
    }
    fn warning(&self, msg: &str) {
        self.lines.borrow_mut().push(msg.to_string());
    }
    fn error(&self, msg: &str) {
        self.lines.borrow_mut().push(msg.to_string());
    }
    fn newline(&self) {
        self.lines.borrow_mut().push(String::new());
    }
    fn progress_start(&self, title: &str) {
        self.lines.borrow_mut().push(title.to_string());
    }
    fn progress_done(&self, msg: &str) {
        self.lines.borrow_mut().push(msg.to_string());
    }
}

/// Canned Plugins API. `versions: None` makes `list_plugin_versions` report
/// the plugin as missing.
#[derive(Default)]
pub struct FakeToolkit {
    pub plugins: Vec<PluginSummary>,
    pub versions: Option<Vec<PluginVersionSummary>>,
    pub configurations: Vec<ConfigurationSummary>,
    pub latest: Option<semver::Version>,
    pub diff: ConfigurationsDiff,
    pub archive_error: Option<fn(String) -> FlexPluginsError>,
    pub calls: RefCell<Vec<String>>,
    pub deployed: RefCell<Vec<DeployRequest>>,
    pub created: RefCell<Vec<CreateConfigurationRequest>>,
}

impl FakeToolkit {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn archive(&self, call: String, resource: String) -> Result<()> {
        self.record(call);
        match self.archive_error {
            Some(make) => Err(make(resource)),
            None => Ok(()),
        }
    }
}

impl PluginsApiToolkit for FakeToolkit {
    fn list_plugins(&self) -> Result<Vec<PluginSummary>> {
        self.record("list_plugins".into());
        Ok(self.plugins.clone())
    }

    fn list_plugin_versions(&self, name: &str) -> Result<Vec<PluginVersionSummary>> {
        self.record(format!("list_plugin_versions {name}"));
        self.versions.clone().ok_or_else(|| FlexPluginsError::NotFound {
            resource: format!("Plugin {name}"),
        })
    }

    fn list_configurations(&self) -> Result<Vec<ConfigurationSummary>> {
        self.record("list_configurations".into());
        Ok(self.configurations.clone())
    }

    fn latest_version(&self, name: &str) -> Result<Option<semver::Version>> {
        self.record(format!("latest_version {name}"));
        Ok(self.latest.clone())
    }

    fn deploy(&self, request: &DeployRequest) -> Result<DeployedPlugin> {
        self.record(format!("deploy {}@{}", request.name, request.version));
        self.deployed.borrow_mut().push(request.clone());
        Ok(DeployedPlugin {
            plugin_sid: "FP00000000000000000000000000000001".into(),
            plugin_version_sid: "FV00000000000000000000000000000001".into(),
            name: request.name.clone(),
            version: request.version.to_string(),
        })
    }

    fn create_configuration(&self, request: &CreateConfigurationRequest) -> Result<Configuration> {
        self.record(format!("create_configuration {}", request.name));
        self.created.borrow_mut().push(request.clone());
        Ok(Configuration {
            sid: CREATED_CONFIGURATION_SID.into(),
            name: request.name.clone(),
            description: request.description.clone(),
            plugins: request.plugins.clone(),
            date_created: date(),
        })
    }

    fn release(&self, configuration_sid: &str) -> Result<Release> {
        self.record(format!("release {configuration_sid}"));
        Ok(Release {
            sid: "FK00000000000000000000000000000001".into(),
            configuration_sid: configuration_sid.to_string(),
            date_created: date(),
        })
    }

    fn archive_plugin(&self, name: &str) -> Result<()> {
        self.archive(format!("archive_plugin {name}"), format!("Plugin {name}"))
    }

    fn archive_plugin_version(&self, name: &str, version: &str) -> Result<()> {
        self.archive(
            format!("archive_plugin_version {name} {version}"),
            format!("Plugin version {name}@{version}"),
        )
    }

    fn archive_configuration(&self, sid: &str) -> Result<()> {
        self.archive(format!("archive_configuration {sid}"), format!("Configuration {sid}"))
    }

    fn diff(&self, old_id: &str, new_id: &str) -> Result<ConfigurationsDiff> {
        self.record(format!("diff {old_id} {new_id}"));
        Ok(self.diff.clone())
    }
}

/// How a script was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    Run,
    Captured,
    Spawn,
}

/// Script runner that records invocations instead of running anything.
#[derive(Default)]
pub struct RecordingRunner {
    pub invocations: RefCell<Vec<(Invocation, ScriptCommand)>>,
    pub captured_output: String,
    /// Every port request is answered with this port, or the requested start when zero.
    pub port: u16,
}

impl RecordingRunner {
    pub fn invocations(&self) -> Vec<(Invocation, ScriptCommand)> {
        self.invocations.borrow().clone()
    }

    pub fn ran(&self, script: &str, args: &[&str]) -> bool {
        self.matches(Invocation::Run, script, args)
    }

    pub fn spawned(&self, script: &str, args: &[&str]) -> bool {
        self.matches(Invocation::Spawn, script, args)
    }

    fn matches(&self, kind: Invocation, script: &str, args: &[&str]) -> bool {
        self.invocations
            .borrow()
            .iter()
            .any(|(k, c)| *k == kind && c.script == script && c.args == args)
    }
}

impl ScriptRunner for RecordingRunner {
    fn run(&self, command: &ScriptCommand) -> Result<()> {
        self.invocations
            .borrow_mut()
            .push((Invocation::Run, command.clone()));
        Ok(())
    }

    fn run_captured(&self, command: &ScriptCommand) -> Result<String> {
        self.invocations
            .borrow_mut()
            .push((Invocation::Captured, command.clone()));
        Ok(self.captured_output.clone())
    }

    fn spawn(&self, command: &ScriptCommand) -> Result<()> {
        self.invocations
            .borrow_mut()
            .push((Invocation::Spawn, command.clone()));
        Ok(())
    }

    fn find_available_port(&self, start: u16) -> Result<u16> {
        Ok(if self.port == 0 { start } else { self.port })
    }
}
