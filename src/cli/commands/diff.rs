use crate::cli::commands::print_helpers::print_header;
use crate::cli::context::CommandContext;
use crate::core::errors::{FlexPluginsError, Result};
use crate::core::models::difference::{Difference, PluginChange};
use crate::core::models::plugin::{ACTIVE_CONFIGURATION, is_configuration_sid};
use crate::core::services::diff_service::{self, DiffOutput, difference_lines, plugin_title_line};
use crate::core::traits::logger::Logger;
use crate::core::traits::toolkit::PluginsApiToolkit;

/// Execute the `flex-plugins diff` command.
///
/// Compares two configurations (either may be `active`) and prints every
/// configuration field, then every plugin marked as added, removed or
/// modified.
pub fn execute(old_id: &str, new_id: &str, ctx: &CommandContext) -> Result<()> {
    // Validate before credentials are needed
    parse_configuration_id(old_id)?;
    parse_configuration_id(new_id)?;
    let toolkit = ctx.toolkit()?;
    run(old_id, new_id, &toolkit, ctx.logger())
}

pub fn run(
    old_id: &str,
    new_id: &str,
    toolkit: &dyn PluginsApiToolkit,
    logger: &dyn Logger,
) -> Result<()> {
    let old_id = parse_configuration_id(old_id)?;
    let new_id = parse_configuration_id(new_id)?;

    let diffs = toolkit.diff(old_id, new_id)?;
    diff_service::render(&diffs, &LoggerDiffOutput { logger });
    Ok(())
}

/// Accept `active` or a configuration SID.
pub fn parse_configuration_id(input: &str) -> Result<&str> {
    if input == ACTIVE_CONFIGURATION || is_configuration_sid(input) {
        Ok(input)
    } else {
        Err(FlexPluginsError::InvalidIdentifier {
            input: input.to_string(),
        })
    }
}

/// Renders diff elements as logger lines.
struct LoggerDiffOutput<'a> {
    logger: &'a dyn Logger,
}

impl DiffOutput for LoggerDiffOutput<'_> {
    fn header(&self, title: &str) {
        print_header(self.logger, title, None);
    }

    fn plugin_title(&self, name: &str, change: PluginChange) {
        self.logger.info(&plugin_title_line(name, change));
    }

    fn difference(&self, diff: &Difference, prefix: &str) {
        for line in difference_lines(diff, prefix) {
            self.logger.info(&line);
        }
    }

    fn newline(&self) {
        self.logger.newline();
    }
}
