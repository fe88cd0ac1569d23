use crate::cli::context::CommandContext;
use crate::core::errors::Result;
use crate::core::traits::script_runner::{ScriptCommand, ScriptRunner};

/// Execute the `flex-plugins build` command.
///
/// Builds the plugin bundle of the current directory.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    ctx.require_plugin_package()?;
    run(&ctx.script_runner())
}

pub fn run(runner: &dyn ScriptRunner) -> Result<()> {
    runner.run(&ScriptCommand::new("pre-script-check"))?;
    runner.run(&ScriptCommand::new("build"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Invocation, RecordingRunner};

    #[test]
    fn checks_then_builds() {
        let runner = RecordingRunner::default();
        run(&runner).unwrap();

        let scripts: Vec<(Invocation, String)> = runner
            .invocations()
            .into_iter()
            .map(|(kind, c)| (kind, c.script))
            .collect();
        assert_eq!(
            scripts,
            vec![
                (Invocation::Run, "pre-script-check".to_string()),
                (Invocation::Run, "build".to_string()),
            ]
        );
    }
}
