use std::path::{Path, PathBuf};

use crate::cli::context::CommandContext;
use crate::core::errors::{FlexPluginsError, Result};
use crate::core::models::manifest::{PackageManifest, PluginsConfig};
use crate::core::services::version_service::check_scripts_version;
use crate::core::traits::logger::Logger;
use crate::core::traits::script_runner::{ScriptCommand, ScriptRunner};

/// Suffix marking a `--name` as a deployed plugin rather than a local one.
const REMOTE_SUFFIX: &str = "@remote";

/// Everything `start` reads before touching the script runner.
pub struct StartInputs<'a> {
    /// Plugins requested with `--name`.
    pub names: &'a [String],
    pub include_remote: bool,
    /// `package.json` of the working directory, when it is a plugin.
    pub package: Option<&'a PackageManifest>,
    pub plugins_config: &'a PluginsConfig,
    pub plugins_config_path: &'a Path,
    pub cwd: &'a Path,
    pub default_port: u16,
}

/// Execute the `flex-plugins start` command.
///
/// Starts Flex locally together with a dev server for every local plugin:
/// the plugin in the current directory and/or those named with `--name`.
pub fn execute(names: &[String], include_remote: bool, ctx: &CommandContext) -> Result<()> {
    let package = ctx.plugin_package()?;
    let plugins_config = ctx.plugins_config()?;

    let inputs = StartInputs {
        names,
        include_remote,
        package: package.as_ref(),
        plugins_config: &plugins_config,
        plugins_config_path: ctx.plugins_config_path(),
        cwd: ctx.cwd(),
        default_port: ctx.config.start.default_port,
    };
    run(&inputs, &ctx.script_runner(), ctx.logger())
}

pub fn run(inputs: &StartInputs<'_>, runner: &dyn ScriptRunner, logger: &dyn Logger) -> Result<()> {
    let mut flex_args: Vec<String> = Vec::new();
    let mut local: Vec<(String, PathBuf)> = Vec::new();

    if inputs.include_remote {
        flex_args.push("--include-remote".into());
    }

    for name in inputs.names {
        flex_args.extend(["--name".to_string(), name.clone()]);
        if name.ends_with(REMOTE_SUFFIX) {
            continue;
        }
        let plugin = inputs
            .plugins_config
            .find(name)
            .ok_or_else(|| not_in_manifest(name, inputs))?;
        local.push((name.clone(), plugin.dir.clone()));
    }

    if let Some(pkg) = inputs.package {
        check_scripts_version(pkg)?;
        if inputs.plugins_config.find(&pkg.name).is_none() {
            return Err(not_in_manifest(&pkg.name, inputs));
        }
        if !local.iter().any(|(name, _)| *name == pkg.name) {
            flex_args.extend(["--name".to_string(), pkg.name.clone()]);
            local.push((pkg.name.clone(), inputs.cwd.to_path_buf()));
        }
    }

    if inputs.package.is_none() && inputs.names.is_empty() {
        return Err(FlexPluginsError::NotPluginDirectory {
            dir: inputs.cwd.to_path_buf(),
        });
    }

    for (name, dir) in &local {
        runner.run(&ScriptCommand::new("check-start").args(["--name", name.as_str()]).cwd(dir))?;
    }

    runner.run(&ScriptCommand::new("start").arg("flex").args(flex_args))?;

    let mut next_port = inputs.default_port;
    for (name, dir) in &local {
        let port = runner.find_available_port(next_port)?;
        next_port = port.saturating_add(1);
        runner.spawn(
            &ScriptCommand::new("start")
                .args(["plugin", "--name", name.as_str(), "--port", port.to_string().as_str()])
                .cwd(dir),
        )?;
        logger.info(&format!("Starting **{name}** on port **{port}**"));
    }

    Ok(())
}

fn not_in_manifest(name: &str, inputs: &StartInputs<'_>) -> FlexPluginsError {
    FlexPluginsError::PluginNotInManifest {
        name: name.to_string(),
        manifest: inputs.plugins_config_path.to_path_buf(),
    }
}
