use std::path::{Path, PathBuf};

use crate::adapters::api::http_toolkit::HttpToolkit;
use crate::adapters::scripts::npx_runner::NpxScriptRunner;
use crate::cli::output::TerminalLogger;
use crate::config::app_config::AppConfig;
use crate::core::errors::{FlexPluginsError, Result};
use crate::core::models::manifest::{PackageManifest, PluginsConfig, is_plugin_folder};
use crate::core::traits::logger::Logger;

/// Shared harness handed to every command: configuration, output, the
/// working directory and factories for the real collaborators.
pub struct CommandContext {
    pub config: AppConfig,
    config_path: PathBuf,
    plugins_config_path: PathBuf,
    cwd: PathBuf,
    account_sid: Option<String>,
    auth_token: Option<String>,
    logger: TerminalLogger,
    pub json: bool,
}

/// Global options that shape the context.
#[derive(Debug, Default)]
pub struct ContextOptions<'a> {
    pub config: Option<&'a str>,
    pub plugins_config: Option<&'a str>,
    pub account_sid: Option<&'a str>,
    pub auth_token: Option<&'a str>,
    pub json: bool,
    pub quiet: bool,
}

impl CommandContext {
    pub fn new(options: &ContextOptions<'_>) -> Result<Self> {
        let config_path = options
            .config
            .map(PathBuf::from)
            .unwrap_or_else(AppConfig::default_path);
        let config = AppConfig::load(&config_path)?;

        Ok(Self {
            config,
            config_path,
            plugins_config_path: options
                .plugins_config
                .map(PathBuf::from)
                .unwrap_or_else(default_plugins_config_path),
            cwd: std::env::current_dir()?,
            account_sid: options.account_sid.map(str::to_string),
            auth_token: options.auth_token.map(str::to_string),
            logger: TerminalLogger::new(options.quiet),
            json: options.json,
        })
    }

    pub fn logger(&self) -> &dyn Logger {
        &self.logger
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Build the Plugins API client. Fails when no credentials are configured.
    pub fn toolkit(&self) -> Result<HttpToolkit> {
        let credentials = self
            .config
            .credentials(self.account_sid.as_deref(), self.auth_token.as_deref())
            .ok_or_else(|| FlexPluginsError::MissingCredentials {
                config: self.config_path.clone(),
            })?;
        HttpToolkit::new(&self.config.api.base_url, credentials, self.config.timeout())
    }

    pub fn script_runner(&self) -> NpxScriptRunner {
        NpxScriptRunner::new(self.config.scripts.npx_path.clone(), self.cwd.clone())
    }

    pub fn plugins_config_path(&self) -> &Path {
        &self.plugins_config_path
    }

    pub fn plugins_config(&self) -> Result<PluginsConfig> {
        PluginsConfig::load(&self.plugins_config_path)
    }

    /// The working directory's `package.json`, or `None` outside a plugin.
    pub fn plugin_package(&self) -> Result<Option<PackageManifest>> {
        if !is_plugin_folder(&self.cwd) {
            return Ok(None);
        }
        PackageManifest::load(&self.cwd).map(Some)
    }

    /// Like `plugin_package`, but outside a plugin directory is an error.
    pub fn require_plugin_package(&self) -> Result<PackageManifest> {
        self.plugin_package()?
            .ok_or_else(|| FlexPluginsError::NotPluginDirectory {
                dir: self.cwd.clone(),
            })
    }
}

/// `~/.twilio-cli/flex/plugins.json`, where the build scripts record local plugins.
pub fn default_plugins_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".twilio-cli")
        .join("flex")
        .join("plugins.json")
}
