use crate::cli::commands::create_configuration::{DEFAULT_DESCRIPTION, default_configuration_name};
use crate::cli::commands::print_helpers::print_json;
use crate::cli::context::CommandContext;
use crate::core::errors::{FlexPluginsError, Result};
use crate::core::models::manifest::PackageManifest;
use crate::core::models::plugin::{DeployRequest, DeployResult, DeployedPlugin};
use crate::core::services::version_service::{Bump, resolve_deploy_version};
use crate::core::traits::logger::Logger;
use crate::core::traits::script_runner::{ScriptCommand, ScriptRunner};
use crate::core::traits::toolkit::PluginsApiToolkit;

/// Flags of `flex-plugins deploy`.
#[derive(Debug, Clone, Default)]
pub struct DeployArgs {
    pub bump: Bump,
    pub version: Option<String>,
    pub public: bool,
    pub changelog: String,
    pub description: Option<String>,
}

/// Execute the `flex-plugins deploy` command.
pub fn execute(args: &DeployArgs, ctx: &CommandContext) -> Result<()> {
    let pkg = ctx.require_plugin_package()?;
    let toolkit = ctx.toolkit()?;
    let deployed = run(args, &pkg, &toolkit, &ctx.script_runner(), ctx.logger())?;
    if ctx.json {
        print_json(&deployed)?;
    }
    Ok(())
}

pub fn run(
    args: &DeployArgs,
    pkg: &PackageManifest,
    toolkit: &dyn PluginsApiToolkit,
    runner: &dyn ScriptRunner,
    logger: &dyn Logger,
) -> Result<DeployedPlugin> {
    let latest = toolkit.latest_version(&pkg.name)?;
    let version = resolve_deploy_version(latest.as_ref(), args.version.as_deref(), args.bump)?;
    tracing::debug!(plugin = %pkg.name, %version, "resolved deploy version");

    runner.run(&ScriptCommand::new("pre-script-check"))?;
    runner.run(&ScriptCommand::new("build"))?;

    let mut deploy = ScriptCommand::new("deploy").args(["--version".to_string(), version.to_string()]);
    if args.public {
        deploy = deploy.arg("--public");
    }
    let output = runner.run_captured(&deploy)?;
    let result = parse_deploy_output(&output)?;
    tracing::debug!(
        url = %result.plugin_url,
        service = ?result.service_sid,
        domain = ?result.domain_name,
        "bundle uploaded"
    );

    logger.progress_start(&format!("Registering **{}**@**{version}**", pkg.name));
    let deployed = toolkit.deploy(&DeployRequest {
        name: pkg.name.clone(),
        url: result.plugin_url,
        version,
        changelog: args.changelog.clone(),
        description: args.description.clone().unwrap_or_default(),
        is_private: !args.public,
    })?;
    logger.progress_done(&format!("Registered **{}**", deployed.plugin_version_sid));

    print_success(logger, &deployed, args.public);
    Ok(deployed)
}

/// The last non-empty line of the `deploy` script's stdout is its JSON result.
pub fn parse_deploy_output(output: &str) -> Result<DeployResult> {
    let line = output
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| FlexPluginsError::ScriptFailed {
            script: "deploy".into(),
            reason: "no output was produced".into(),
        })?;

    serde_json::from_str(line).map_err(|e| FlexPluginsError::ScriptFailed {
        script: "deploy".into(),
        reason: format!("unexpected output '{line}': {e}"),
    })
}

fn print_success(logger: &dyn Logger, deployed: &DeployedPlugin, public: bool) {
    let availability = if public { "public" } else { "private" };
    let reference = format!("{}@{}", deployed.name, deployed.version);

    logger.newline();
    logger.success(&format!(
        "🚀 Plugin ({availability}) **{}**@**{}** was successfully deployed using Plugins API",
        deployed.name, deployed.version
    ));
    logger.newline();
    logger.info("**Next Steps:**");
    logger.info(&format!(
        "Run {{{{$ flex-plugins release --plugin {reference} --name \"{}\" --description \"{DEFAULT_DESCRIPTION}\"}}}} to enable this plugin on your flex instance",
        default_configuration_name()
    ));
    logger.newline();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::print_helpers::to_json;
    use crate::test_support::{FakeToolkit, Invocation, RecordingLogger, RecordingRunner};
    use semver::Version;

    const URL: &str = "https://plugins-1234.twil.io/plugins/plugin-one/0.0.2/bundle.js";

    fn pkg() -> PackageManifest {
        PackageManifest {
            name: "plugin-one".into(),
            ..Default::default()
        }
    }

    fn runner() -> RecordingRunner {
        RecordingRunner {
            captured_output: format!("Uploading bundle\n{{\"pluginUrl\":\"{URL}\"}}\n\n"),
            ..Default::default()
        }
    }

    fn args() -> DeployArgs {
        DeployArgs {
            changelog: "First".into(),
            ..Default::default()
        }
    }

    #[test]
    fn builds_uploads_and_registers() {
        let toolkit = FakeToolkit {
            latest: Some(Version::new(0, 0, 1)),
            ..Default::default()
        };
        let runner = runner();
        let logger = RecordingLogger::default();

        let deployed = run(&args(), &pkg(), &toolkit, &runner, &logger).unwrap();

        assert_eq!(deployed.version, "0.0.2");
        let scripts: Vec<(Invocation, String)> = runner
            .invocations()
            .into_iter()
            .map(|(k, c)| (k, c.script))
            .collect();
        assert_eq!(
            scripts,
            vec![
                (Invocation::Run, "pre-script-check".to_string()),
                (Invocation::Run, "build".to_string()),
                (Invocation::Captured, "deploy".to_string()),
            ]
        );

        let request = toolkit.deployed.borrow()[0].clone();
        assert_eq!(request.url, URL);
        assert!(request.is_private);
        assert_eq!(request.changelog, "First");
        assert!(logger.contains("(private) **plugin-one**@**0.0.2** was successfully deployed"));
        assert!(logger.contains("{{$ flex-plugins release --plugin plugin-one@0.0.2 --name"));
        assert!(!logger.contains("legacy"));
    }

    #[test]
    fn public_flag_reaches_script_and_api() {
        let toolkit = FakeToolkit::default();
        let runner = runner();
        let args = DeployArgs {
            public: true,
            bump: Bump::Major,
            ..args()
        };

        run(&args, &pkg(), &toolkit, &runner, &RecordingLogger::default()).unwrap();

        let (_, deploy) = runner
            .invocations()
            .into_iter()
            .find(|(k, _)| *k == Invocation::Captured)
            .unwrap();
        assert_eq!(deploy.args, vec!["--version", "1.0.0", "--public"]);
        assert!(!toolkit.deployed.borrow()[0].is_private);
    }

    #[test]
    fn stale_version_fails_before_building() {
        let toolkit = FakeToolkit {
            latest: Some(Version::new(2, 0, 0)),
            ..Default::default()
        };
        let runner = runner();
        let args = DeployArgs {
            version: Some("1.5.0".into()),
            ..args()
        };

        let err = run(&args, &pkg(), &toolkit, &runner, &RecordingLogger::default()).unwrap_err();

        assert!(matches!(err, FlexPluginsError::VersionNotGreater { .. }));
        assert!(runner.invocations().is_empty());
        assert!(toolkit.deployed.borrow().is_empty());
    }

    #[test]
    fn json_output_uses_camel_case_sids() {
        let toolkit = FakeToolkit::default();
        let logger = RecordingLogger::default();
        let deployed = run(&args(), &pkg(), &toolkit, &runner(), &logger).unwrap();

        let value: serde_json::Value = serde_json::from_str(&to_json(&deployed).unwrap()).unwrap();

        assert_eq!(value["pluginVersionSid"], "FV00000000000000000000000000000001");
        assert_eq!(value["version"], "0.0.1");
    }

    #[test]
    fn garbage_script_output_is_a_script_failure() {
        let err = parse_deploy_output("done\n").unwrap_err();
        assert!(matches!(err, FlexPluginsError::ScriptFailed { .. }));
        assert!(parse_deploy_output("  \n").is_err());
    }
}
