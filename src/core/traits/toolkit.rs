use crate::core::errors::Result;
use crate::core::models::difference::ConfigurationsDiff;
use crate::core::models::plugin::{
    Configuration, ConfigurationSummary, DeployRequest, DeployedPlugin, PluginSummary,
    PluginVersionRef, PluginVersionSummary, Release,
};

/// Parameters for creating a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateConfigurationRequest {
    pub name: String,
    pub description: String,
    pub plugins: Vec<PluginVersionRef>,
    /// Carry over the plugins of the active configuration.
    pub from_active: bool,
}

/// Port for the Flex Plugins API.
///
/// Implementations live in `adapters::api`. Commands only depend on this
/// trait so they can be driven by test doubles.
pub trait PluginsApiToolkit {
    /// List every plugin on the account, flagging those in the active release.
    fn list_plugins(&self) -> Result<Vec<PluginSummary>>;

    /// List the versions of one plugin.
    fn list_plugin_versions(&self, name: &str) -> Result<Vec<PluginVersionSummary>>;

    /// List every configuration on the account.
    fn list_configurations(&self) -> Result<Vec<ConfigurationSummary>>;

    /// Latest registered version of a plugin, `None` if it was never deployed.
    fn latest_version(&self, name: &str) -> Result<Option<semver::Version>>;

    /// Register a plugin (if new) and a new version pointing at an uploaded bundle.
    fn deploy(&self, request: &DeployRequest) -> Result<DeployedPlugin>;

    /// Create a configuration from a set of plugin versions.
    fn create_configuration(&self, request: &CreateConfigurationRequest) -> Result<Configuration>;

    /// Make a configuration the active one.
    fn release(&self, configuration_sid: &str) -> Result<Release>;

    fn archive_plugin(&self, name: &str) -> Result<()>;

    fn archive_plugin_version(&self, name: &str, version: &str) -> Result<()>;

    fn archive_configuration(&self, sid: &str) -> Result<()>;

    /// Field-level diff between two configurations. Either identifier may be
    /// `active`.
    fn diff(&self, old_id: &str, new_id: &str) -> Result<ConfigurationsDiff>;
}
