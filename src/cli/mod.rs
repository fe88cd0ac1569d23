pub mod commands;
pub mod context;
pub mod output;

use clap::{Args, Parser, Subcommand};

use crate::cli::commands::archive::ArchiveTarget;
use crate::cli::commands::create_configuration::ConfigurationArgs;
use crate::cli::commands::list::ListTarget;
use crate::cli::commands::release::ReleaseTarget;
use crate::core::services::version_service::Bump;

/// Build, test, run and ship Twilio Flex plugins.
#[derive(Parser, Debug)]
#[command(name = "flex-plugins", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to alternative config file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Path to the local plugins manifest (default: ~/.twilio-cli/flex/plugins.json)
    #[arg(long, global = true)]
    pub plugins_config: Option<String>,

    /// Twilio account SID
    #[arg(long, global = true, env = "TWILIO_ACCOUNT_SID", hide_env_values = true)]
    pub account_sid: Option<String>,

    /// Twilio auth token
    #[arg(long, global = true, env = "TWILIO_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Print fetched resources as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the plugin in the current directory
    Build,

    /// Run the plugin's tests
    Test,

    /// Start Flex locally with one or more plugins
    Start {
        /// Plugin to start. Suffix with @remote to load the deployed version
        #[arg(long = "name")]
        names: Vec<String>,
        /// Also load every deployed plugin
        #[arg(long)]
        include_remote: bool,
    },

    /// Build, upload and register a new plugin version
    Deploy {
        /// Bump the major version
        #[arg(long, conflicts_with_all = ["minor", "patch", "version"])]
        major: bool,
        /// Bump the minor version
        #[arg(long, conflicts_with_all = ["patch", "version"])]
        minor: bool,
        /// Bump the patch version (default)
        #[arg(long, conflicts_with = "version")]
        patch: bool,
        /// Explicit version; must be greater than the latest deployed one
        #[arg(long)]
        version: Option<String>,
        /// Make the plugin bundle publicly accessible
        #[arg(long)]
        public: bool,
        /// Changelog for this version
        #[arg(long)]
        changelog: String,
        /// Plugin description
        #[arg(long)]
        description: Option<String>,
    },

    /// Create a configuration from plugin versions
    CreateConfiguration {
        #[command(flatten)]
        args: ConfigurationFlags,
    },

    /// Enable a configuration, creating it first when needed
    Release {
        /// Existing configuration to enable
        #[arg(long, conflicts_with_all = ["plugins", "new", "name", "description"])]
        configuration_sid: Option<String>,
        /// Plugin version to include, as name@version. Repeatable
        #[arg(long = "plugin", required_unless_present = "configuration_sid")]
        plugins: Vec<String>,
        /// Start from an empty configuration instead of the active one
        #[arg(long)]
        new: bool,
        /// Configuration name
        #[arg(long)]
        name: Option<String>,
        /// Configuration description
        #[arg(long)]
        description: Option<String>,
    },

    /// Archive a plugin, plugin version or configuration
    Archive {
        #[command(subcommand)]
        target: ArchiveCommand,
    },

    /// List plugins, plugin versions or configurations
    List {
        #[command(subcommand)]
        target: ListCommand,
    },

    /// Compare two configurations
    Diff {
        /// Configuration SID, or `active`
        old_id: String,
        /// Configuration SID, or `active`
        new_id: String,
    },
}

#[derive(Args, Debug)]
pub struct ConfigurationFlags {
    /// Plugin version to include, as name@version. Repeatable
    #[arg(long = "plugin", required = true)]
    pub plugins: Vec<String>,
    /// Start from an empty configuration instead of the active one
    #[arg(long)]
    pub new: bool,
    /// Configuration name
    #[arg(long)]
    pub name: Option<String>,
    /// Configuration description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ArchiveCommand {
    /// Archive a plugin and all its versions
    Plugin {
        #[arg(long)]
        name: String,
    },
    /// Archive one version of a plugin
    PluginVersion {
        #[arg(long)]
        name: String,
        #[arg(long)]
        version: String,
    },
    /// Archive a configuration
    Configuration {
        #[arg(long)]
        sid: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// List plugins on the account
    Plugins,
    /// List versions of a plugin
    PluginVersions {
        #[arg(long)]
        name: String,
    },
    /// List configurations on the account
    Configurations,
}

impl From<&ConfigurationFlags> for ConfigurationArgs {
    fn from(flags: &ConfigurationFlags) -> Self {
        Self {
            plugins: flags.plugins.clone(),
            new: flags.new,
            name: flags.name.clone(),
            description: flags.description.clone(),
        }
    }
}

impl From<&ArchiveCommand> for ArchiveTarget {
    fn from(cmd: &ArchiveCommand) -> Self {
        match cmd {
            ArchiveCommand::Plugin { name } => Self::Plugin { name: name.clone() },
            ArchiveCommand::PluginVersion { name, version } => Self::PluginVersion {
                name: name.clone(),
                version: version.clone(),
            },
            ArchiveCommand::Configuration { sid } => Self::Configuration { sid: sid.clone() },
        }
    }
}

impl From<&ListCommand> for ListTarget {
    fn from(cmd: &ListCommand) -> Self {
        match cmd {
            ListCommand::Plugins => Self::Plugins,
            ListCommand::PluginVersions { name } => Self::PluginVersions { name: name.clone() },
            ListCommand::Configurations => Self::Configurations,
        }
    }
}

/// Bump selected by the deploy flags, patch unless told otherwise.
pub fn bump_from_flags(major: bool, minor: bool) -> Bump {
    if major {
        Bump::Major
    } else if minor {
        Bump::Minor
    } else {
        Bump::Patch
    }
}

/// Release target from the `release` flags.
pub fn release_target(
    configuration_sid: Option<&str>,
    plugins: &[String],
    new: bool,
    name: Option<&str>,
    description: Option<&str>,
) -> ReleaseTarget {
    match configuration_sid {
        Some(sid) => ReleaseTarget::Existing(sid.to_string()),
        None => ReleaseTarget::New(ConfigurationArgs {
            plugins: plugins.to_vec(),
            new,
            name: name.map(str::to_string),
            description: description.map(str::to_string),
        }),
    }
}
