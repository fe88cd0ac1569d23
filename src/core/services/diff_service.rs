use crate::core::models::difference::{ConfigurationsDiff, Difference, PluginChange};
use crate::core::services::display::{display_value, header_label, is_truthy};

/// Line prefix for the fields of a plugin inside a configuration diff.
pub const PLUGIN_DIFF_PREFIX: &str = "..│.. ";

/// Sink for a rendered configuration diff, one call per element.
pub trait DiffOutput {
    fn header(&self, title: &str);
    fn plugin_title(&self, name: &str, change: PluginChange);
    fn difference(&self, diff: &Difference, prefix: &str);
    fn newline(&self);
}

/// Classify the change set of one plugin.
///
/// Removed is checked before Added, anything else is Modified. An empty
/// change set is reported as Added.
pub fn classify(diffs: &[Difference]) -> PluginChange {
    if diffs.is_empty() {
        return PluginChange::Added;
    }

    let is_deleted = diffs
        .iter()
        .all(|d| d.after.is_none() && d.before.is_some());
    let is_added = diffs
        .iter()
        .all(|d| d.before.is_none() && d.after.is_some());

    if is_deleted {
        PluginChange::Removed
    } else if is_added {
        PluginChange::Added
    } else {
        PluginChange::Modified
    }
}

/// Walk a configuration diff: configuration fields, then a single
/// `Plugins` header, then each plugin's title and fields.
pub fn render(diffs: &ConfigurationsDiff, out: &dyn DiffOutput) {
    for diff in &diffs.configuration {
        out.difference(diff, "");
    }
    out.newline();

    out.header("Plugins");
    for (name, plugin_diffs) in &diffs.plugins {
        out.plugin_title(name, classify(plugin_diffs));
        for diff in plugin_diffs {
            out.difference(diff, PLUGIN_DIFF_PREFIX);
        }
        out.newline();
    }
}

/// Title line of a plugin, marked by its change.
pub fn plugin_title_line(name: &str, change: PluginChange) -> String {
    match change {
        PluginChange::Removed => format!("**--- {name}--**"),
        PluginChange::Added => format!("**+++ {name}++**"),
        PluginChange::Modified => format!("**{name}**"),
    }
}

/// Lines for one difference entry.
///
/// Unchanged fields yield one line with the `before` value. Changed fields
/// yield a removed line and an added line, each only when its value is
/// truthy, so a falsy `before` such as `""` or `0` is not shown.
pub fn difference_lines(diff: &Difference, prefix: &str) -> Vec<String> {
    let header = header_label(&diff.path);

    if !diff.has_diff {
        return vec![format!(
            "{prefix}{header}: {}",
            display_value(&diff.path, diff.before.as_ref())
        )];
    }

    let mut lines = Vec::with_capacity(2);
    if is_truthy(diff.before.as_ref()) {
        lines.push(format!(
            "{prefix}--- {header}: {}--",
            display_value(&diff.path, diff.before.as_ref())
        ));
    }
    if is_truthy(diff.after.as_ref()) {
        lines.push(format!(
            "{prefix}+++ {header}: {}++",
            display_value(&diff.path, diff.after.as_ref())
        ));
    }
    lines
}
