use std::cell::RefCell;
use std::sync::LazyLock;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;

use crate::core::traits::logger::Logger;

static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("Invalid code markup regex"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("Invalid bold markup regex"));
static ADDED: LazyLock<Regex> = LazyLock::new(|| color_span("++"));
static REMOVED: LazyLock<Regex> = LazyLock::new(|| color_span("--"));
static WARN: LazyLock<Regex> = LazyLock::new(|| color_span("!!"));
static DIM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)\.\.(\S+?)\.\.").expect("Invalid dim markup regex"));

/// Color span delimited by `marker`. It opens at the start, after whitespace
/// or after `**`, and runs to the end or to a closing `**`, so the same
/// characters inside a value stay literal.
fn color_span(marker: &str) -> Regex {
    let m = regex::escape(marker);
    Regex::new(&format!(r"(^|\s|\*\*){m}(.+){m}(\*\*|$)"))
        .expect("Invalid color markup regex")
}

/// Apply the inline styles (everything except code spans) to `text`.
fn style_segment(text: &str) -> String {
    let text = REMOVED.replace_all(text, |c: &regex::Captures| {
        format!("{}{}{}", &c[1], c[2].red(), &c[3])
    });
    let text = ADDED.replace_all(&text, |c: &regex::Captures| {
        format!("{}{}{}", &c[1], c[2].green(), &c[3])
    });
    let text = WARN.replace_all(&text, |c: &regex::Captures| {
        format!("{}{}{}", &c[1], c[2].yellow(), &c[3])
    });
    let text = DIM.replace_all(&text, |c: &regex::Captures| format!("{}{}", &c[1], c[2].dimmed()));
    BOLD.replace_all(&text, |c: &regex::Captures| c[1].bold().to_string())
        .into_owned()
}

/// Render message markup for the terminal.
///
/// `{{code}}` spans are shown verbatim in cyan, so flags such as `--name`
/// inside them are not mistaken for markup.
pub fn render_markup(msg: &str) -> String {
    let mut out = String::with_capacity(msg.len());
    let mut last = 0;
    for caps in CODE.captures_iter(msg) {
        let whole = caps.get(0).expect("capture 0 always exists");
        out.push_str(&style_segment(&msg[last..whole.start()]));
        out.push_str(&caps[1].cyan().to_string());
        last = whole.end();
    }
    out.push_str(&style_segment(&msg[last..]));
    out
}

/// Print a success message.
pub fn success(msg: &str) {
    println!("  {} {}", "✓".green(), render_markup(msg));
}

/// Print a warning message.
pub fn warning(msg: &str) {
    println!("  {} {}", "⚠".yellow(), render_markup(msg));
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Start a spinner for a long-running step.
pub fn spinner(msg: &str) -> ProgressBar {
    let sp = ProgressBar::new_spinner();
    sp.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    sp.set_message(render_markup(msg));
    sp.enable_steady_tick(Duration::from_millis(80));
    sp
}

/// Clear a spinner and print its completion message.
pub fn finish_spinner(sp: ProgressBar, msg: &str) {
    sp.finish_and_clear();
    success(msg);
}

/// `Logger` writing to the terminal.
pub struct TerminalLogger {
    quiet: bool,
    spinner: RefCell<Option<ProgressBar>>,
}

impl TerminalLogger {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            spinner: RefCell::new(None),
        }
    }
}

impl Logger for TerminalLogger {
    fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", render_markup(msg));
        }
    }

    fn success(&self, msg: &str) {
        if !self.quiet {
            success(msg);
        }
    }

    fn warning(&self, msg: &str) {
        warning(msg);
    }

    fn error(&self, msg: &str) {
        error(msg);
    }

    fn newline(&self) {
        if !self.quiet {
            println!();
        }
    }

    fn progress_start(&self, title: &str) {
        if self.quiet {
            return;
        }
        if let Some(previous) = self.spinner.replace(Some(spinner(title))) {
            previous.finish_and_clear();
        }
    }

    fn progress_done(&self, msg: &str) {
        match self.spinner.take() {
            Some(sp) => finish_spinner(sp, msg),
            None => self.success(msg),
        }
    }
}

impl Drop for TerminalLogger {
    fn drop(&mut self) {
        if let Some(sp) = self.spinner.get_mut().take() {
            sp.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(msg: &str) -> String {
        colored::control::set_override(false);
        render_markup(msg)
    }

    #[test]
    fn markers_are_stripped() {
        assert_eq!(plain("**Plugins**"), "Plugins");
        assert_eq!(plain("--- Name: X--"), "- Name: X");
        assert_eq!(plain("+++ Name: Y++"), "+ Name: Y");
        assert_eq!(plain("!!No plugins were found.!!"), "No plugins were found.");
        assert_eq!(plain("..│.. Phase: 3"), "│ Phase: 3");
    }

    #[test]
    fn markers_inside_values_stay_literal() {
        assert_eq!(plain("--- Name: my--plugin--"), "- Name: my--plugin");
        assert_eq!(plain("**+++ a++b++**"), "+ a++b");
        assert_eq!(
            plain("..│.. --- Description: wait.. done..--"),
            "│ - Description: wait.. done.."
        );
        assert_eq!(plain("Version 1.0.0--beta is live"), "Version 1.0.0--beta is live");
    }

    #[test]
    fn code_spans_keep_flags() {
        assert_eq!(
            plain("Run {{$ flex-plugins release --plugin p@1.0.0 --name \"x\"}} next"),
            "Run $ flex-plugins release --plugin p@1.0.0 --name \"x\" next"
        );
    }

    #[test]
    fn text_without_markup_is_unchanged() {
        assert_eq!(plain("Archiving Plugin Version 1.0.0"), "Archiving Plugin Version 1.0.0");
    }
}
