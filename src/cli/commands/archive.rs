use crate::cli::context::CommandContext;
use crate::core::errors::{FlexPluginsError, Result};
use crate::core::models::plugin::is_configuration_sid;
use crate::core::traits::logger::Logger;
use crate::core::traits::toolkit::PluginsApiToolkit;

/// Resource to archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveTarget {
    Plugin { name: String },
    PluginVersion { name: String, version: String },
    Configuration { sid: String },
}

impl ArchiveTarget {
    /// Human label used in progress and success messages.
    pub fn label(&self) -> String {
        match self {
            Self::Plugin { name } => format!("Plugin {name}"),
            Self::PluginVersion { version, .. } => format!("Plugin Version {version}"),
            Self::Configuration { sid } => format!("Configuration {sid}"),
        }
    }
}

/// Execute the `flex-plugins archive` command.
pub fn execute(target: &ArchiveTarget, ctx: &CommandContext) -> Result<()> {
    validate(target)?;
    let toolkit = ctx.toolkit()?;
    run(target, &toolkit, ctx.logger())
}

pub fn run(target: &ArchiveTarget, toolkit: &dyn PluginsApiToolkit, logger: &dyn Logger) -> Result<()> {
    validate(target)?;

    let label = target.label();
    logger.progress_start(&format!("Archiving {label}"));
    match target {
        ArchiveTarget::Plugin { name } => toolkit.archive_plugin(name)?,
        ArchiveTarget::PluginVersion { name, version } => {
            toolkit.archive_plugin_version(name, version)?
        }
        ArchiveTarget::Configuration { sid } => toolkit.archive_configuration(sid)?,
    }
    logger.progress_done(&format!("**{label}** was successfully archived."));
    Ok(())
}

fn validate(target: &ArchiveTarget) -> Result<()> {
    match target {
        ArchiveTarget::Configuration { sid } if !is_configuration_sid(sid) => {
            Err(FlexPluginsError::InvalidIdentifier { input: sid.clone() })
        }
        _ => Ok(()),
    }
}
