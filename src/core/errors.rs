use std::path::PathBuf;

/// All domain errors for the Flex plugins CLI.
///
/// Validation variants are raised locally before any remote call or script
/// run; the remaining variants wrap failures reported by the Plugins API or
/// by the plugin scripts.
#[derive(Debug, thiserror::Error)]
pub enum FlexPluginsError {
    #[error("Identifier must be a ConfigurationSid instead got {input}")]
    InvalidIdentifier { input: String },

    #[error("Invalid argument: {detail}")]
    InvalidArgument { detail: String },

    #[error(
        "{dir} directory is not a flex plugin directory\n\n  \
         Run this command inside a plugin directory (one whose package.json\n  \
         depends on flex-plugin-scripts), or pass one or more --name flags."
    )]
    NotPluginDirectory { dir: PathBuf },

    #[error(
        "Package 'flex-plugin-scripts' versioning is not compatible: found {found}, \
         but at least {required} is required\n\n  \
         Upgrade the plugin: npm install flex-plugin-scripts@{required_major}"
    )]
    IncompatibleScripts {
        found: String,
        required: semver::Version,
        required_major: u64,
    },

    #[error(
        "Plugin {name} was not found in {manifest}\n\n  \
         Make sure the plugin has been started at least once from its directory,\n  \
         or append @remote to the name to load the deployed version."
    )]
    PluginNotInManifest { name: String, manifest: PathBuf },

    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    #[error("The provided version {requested} must be greater than {latest}")]
    VersionNotGreater {
        requested: semver::Version,
        latest: semver::Version,
    },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(
        "No Twilio credentials found\n\n  \
         Provide them with one of:\n    \
         → --account-sid / --auth-token flags\n    \
         → TWILIO_ACCOUNT_SID / TWILIO_AUTH_TOKEN environment variables\n    \
         → [credentials] section of {config}"
    )]
    MissingCredentials { config: PathBuf },

    #[error("Failed to read {path}: {detail}")]
    ManifestError { path: PathBuf, detail: String },

    #[error("Plugins API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("{resource} was not found")]
    NotFound { resource: String },

    #[error("{resource} is already archived")]
    AlreadyArchived { resource: String },

    #[error("{resource} is part of the active release and cannot be archived")]
    ActiveResource { resource: String },

    #[error("Could not reach the Plugins API: {reason}")]
    Network { reason: String },

    #[error("Script '{script}' failed: {reason}")]
    ScriptFailed { script: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FlexPluginsError>;
