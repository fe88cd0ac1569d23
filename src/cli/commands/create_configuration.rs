use chrono::Utc;

use crate::cli::commands::print_helpers::{print_json, print_pretty};
use crate::cli::context::CommandContext;
use crate::core::errors::Result;
use crate::core::models::plugin::{Configuration, PluginVersionRef};
use crate::core::traits::logger::Logger;
use crate::core::traits::toolkit::{CreateConfigurationRequest, PluginsApiToolkit};

pub const DEFAULT_DESCRIPTION: &str = "Created by the flex-plugins CLI";

/// Flags shared by `create-configuration` and `release`.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationArgs {
    pub plugins: Vec<String>,
    pub new: bool,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// `Autogenerated Release {unix-millis}`.
pub fn default_configuration_name() -> String {
    format!("Autogenerated Release {}", Utc::now().timestamp_millis())
}

/// Validate the `--plugin` references and fill in defaults.
pub fn build_request(args: &ConfigurationArgs) -> Result<CreateConfigurationRequest> {
    let plugins = args
        .plugins
        .iter()
        .map(|p| p.parse::<PluginVersionRef>())
        .collect::<Result<Vec<_>>>()?;

    Ok(CreateConfigurationRequest {
        name: args.name.clone().unwrap_or_else(default_configuration_name),
        description: args
            .description
            .clone()
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        plugins,
        from_active: !args.new,
    })
}

/// Create a configuration with progress output.
pub fn create(
    args: &ConfigurationArgs,
    toolkit: &dyn PluginsApiToolkit,
    logger: &dyn Logger,
) -> Result<Configuration> {
    let request = build_request(args)?;
    logger.progress_start("Creating configuration");
    let configuration = toolkit.create_configuration(&request)?;
    logger.progress_done(&format!(
        "Configuration **{}** was successfully created",
        configuration.sid
    ));
    Ok(configuration)
}

/// Execute the `flex-plugins create-configuration` command.
pub fn execute(args: &ConfigurationArgs, ctx: &CommandContext) -> Result<()> {
    // Reject malformed references before looking for credentials
    build_request(args)?;
    let toolkit = ctx.toolkit()?;
    let configuration = run(args, &toolkit, ctx.logger())?;
    if ctx.json {
        print_json(&configuration)?;
    }
    Ok(())
}

pub fn run(
    args: &ConfigurationArgs,
    toolkit: &dyn PluginsApiToolkit,
    logger: &dyn Logger,
) -> Result<Configuration> {
    let configuration = create(args, toolkit, logger)?;

    logger.newline();
    print_pretty(logger, &configuration, &["plugins"]);
    for plugin in &configuration.plugins {
        logger.info(&format!("  ..│.. **{plugin}**"));
    }
    logger.newline();
    Ok(configuration)
}
