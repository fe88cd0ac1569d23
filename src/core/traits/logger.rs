/// Port for user-facing terminal output.
///
/// Messages may carry inline markup (`**bold**`, `++added++`, `--removed--`,
/// `!!warning!!`, `..dim..`, `{{code}}`) which the terminal implementation
/// renders and test doubles keep verbatim.
pub trait Logger {
    /// Print one informational line.
    fn info(&self, msg: &str);

    /// Print a success line.
    fn success(&self, msg: &str);

    /// Print a warning line.
    fn warning(&self, msg: &str);

    /// Print an error line.
    fn error(&self, msg: &str);

    /// Print an empty line.
    fn newline(&self);

    /// Begin a long-running step.
    fn progress_start(&self, title: &str);

    /// Finish the step started by `progress_start`.
    fn progress_done(&self, msg: &str);
}
