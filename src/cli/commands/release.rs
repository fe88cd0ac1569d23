use crate::cli::commands::create_configuration::{ConfigurationArgs, build_request, create};
use crate::cli::commands::print_helpers::print_json;
use crate::cli::context::CommandContext;
use crate::core::errors::{FlexPluginsError, Result};
use crate::core::models::plugin::{Release, is_configuration_sid};
use crate::core::traits::logger::Logger;
use crate::core::traits::toolkit::PluginsApiToolkit;

/// What `release` should enable.
#[derive(Debug, Clone)]
pub enum ReleaseTarget {
    /// An existing configuration.
    Existing(String),
    /// A configuration created on the fly.
    New(ConfigurationArgs),
}

/// Execute the `flex-plugins release` command.
pub fn execute(target: &ReleaseTarget, ctx: &CommandContext) -> Result<()> {
    validate(target)?;
    let toolkit = ctx.toolkit()?;
    let release = run(target, &toolkit, ctx.logger())?;
    if ctx.json {
        print_json(&release)?;
    }
    Ok(())
}

pub fn run(
    target: &ReleaseTarget,
    toolkit: &dyn PluginsApiToolkit,
    logger: &dyn Logger,
) -> Result<Release> {
    validate(target)?;

    let sid = match target {
        ReleaseTarget::Existing(sid) => sid.clone(),
        ReleaseTarget::New(args) => create(args, toolkit, logger)?.sid,
    };

    logger.progress_start(&format!("Enabling configuration **{sid}**"));
    let release = toolkit.release(&sid)?;
    logger.progress_done(&format!("🚀 Configuration **{sid}** was successfully enabled"));
    Ok(release)
}

fn validate(target: &ReleaseTarget) -> Result<()> {
    match target {
        ReleaseTarget::Existing(sid) if !is_configuration_sid(sid) => {
            Err(FlexPluginsError::InvalidIdentifier { input: sid.clone() })
        }
        ReleaseTarget::Existing(_) => Ok(()),
        ReleaseTarget::New(args) => build_request(args).map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CREATED_CONFIGURATION_SID, FakeToolkit, RecordingLogger};

    const SID: &str = "FJ00000000000000000000000000000001";

    #[test]
    fn releases_existing_configuration() {
        let toolkit = FakeToolkit::default();
        let logger = RecordingLogger::default();

        let release = run(&ReleaseTarget::Existing(SID.into()), &toolkit, &logger).unwrap();

        assert_eq!(release.configuration_sid, SID);
        assert_eq!(toolkit.calls(), vec![format!("release {SID}")]);
        assert_eq!(
            logger.lines(),
            vec![
                format!("Enabling configuration **{SID}**"),
                format!("🚀 Configuration **{SID}** was successfully enabled"),
            ]
        );
    }

    #[test]
    fn creates_then_releases() {
        let toolkit = FakeToolkit::default();
        let logger = RecordingLogger::default();
        let target = ReleaseTarget::New(ConfigurationArgs {
            plugins: vec!["plugin-one@1.0.0".into()],
            name: Some("Spring".into()),
            ..Default::default()
        });

        run(&target, &toolkit, &logger).unwrap();

        assert_eq!(
            toolkit.calls(),
            vec![
                "create_configuration Spring".to_string(),
                format!("release {CREATED_CONFIGURATION_SID}"),
            ]
        );
        let created = logger.position("was successfully created").unwrap();
        let enabled = logger.position("was successfully enabled").unwrap();
        assert!(created < enabled);
    }

    #[test]
    fn rejects_non_configuration_sid() {
        let toolkit = FakeToolkit::default();
        let err = run(
            &ReleaseTarget::Existing("FP00000000000000000000000000000001".into()),
            &toolkit,
            &RecordingLogger::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FlexPluginsError::InvalidIdentifier { .. }));
        assert!(toolkit.calls().is_empty());
    }
}
