use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::errors::Result;

/// One invocation of a plugin build script.
///
/// Environment variables and the working directory are passed explicitly;
/// the CLI never mutates its own process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCommand {
    pub script: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub cwd: Option<PathBuf>,
}

impl ScriptCommand {
    pub fn new(script: &str) -> Self {
        Self {
            script: script.to_string(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

/// Port for the plugin build-script package.
pub trait ScriptRunner {
    /// Run a script to completion with inherited stdio.
    fn run(&self, command: &ScriptCommand) -> Result<()>;

    /// Run a script to completion and return its captured stdout.
    fn run_captured(&self, command: &ScriptCommand) -> Result<String>;

    /// Start a script in the background without waiting for it.
    fn spawn(&self, command: &ScriptCommand) -> Result<()>;

    /// First free local TCP port at or after `start`.
    fn find_available_port(&self, start: u16) -> Result<u16>;
}
