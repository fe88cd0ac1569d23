use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::core::errors::{FlexPluginsError, Result};
use crate::core::traits::script_runner::{ScriptCommand, ScriptRunner};

/// Binary exposed by the `flex-plugin-scripts` package.
const SCRIPTS_BIN: &str = "flex-plugin";

/// Script runner that shells out to `npx flex-plugin <script>`.
///
/// Requires Node.js and the plugin's dependencies to be installed.
pub struct NpxScriptRunner {
    /// Path to the npx binary.
    npx_path: PathBuf,
    /// Directory used when a command does not set its own.
    default_dir: PathBuf,
}

impl NpxScriptRunner {
    pub fn new(npx_path: PathBuf, default_dir: PathBuf) -> Self {
        Self {
            npx_path,
            default_dir,
        }
    }

    fn command(&self, script: &ScriptCommand) -> Command {
        let mut cmd = Command::new(&self.npx_path);
        cmd.arg(SCRIPTS_BIN)
            .arg(&script.script)
            .args(&script.args)
            .envs(&script.env)
            .current_dir(script.cwd.as_ref().unwrap_or(&self.default_dir));
        debug!(script = %script.script, args = ?script.args, cwd = ?script.cwd, "running plugin script");
        cmd
    }

    fn failed(script: &ScriptCommand, reason: String) -> FlexPluginsError {
        FlexPluginsError::ScriptFailed {
            script: script.script.clone(),
            reason,
        }
    }
}

impl ScriptRunner for NpxScriptRunner {
    fn run(&self, script: &ScriptCommand) -> Result<()> {
        let status = self
            .command(script)
            .status()
            .map_err(|e| Self::failed(script, format!("could not start npx: {e}")))?;

        if !status.success() {
            return Err(Self::failed(script, format!("exited with {status}")));
        }
        Ok(())
    }

    fn run_captured(&self, script: &ScriptCommand) -> Result<String> {
        let output = self
            .command(script)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| Self::failed(script, format!("could not start npx: {e}")))?;

        if !output.status.success() {
            return Err(Self::failed(script, format!("exited with {}", output.status)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn spawn(&self, script: &ScriptCommand) -> Result<()> {
        let child = self
            .command(script)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| Self::failed(script, format!("could not start npx: {e}")))?;
        debug!(pid = child.id(), script = %script.script, "spawned plugin script");
        Ok(())
    }

    fn find_available_port(&self, start: u16) -> Result<u16> {
        (start..=u16::MAX)
            .find(|port| TcpListener::bind(("127.0.0.1", *port)).is_ok())
            .ok_or_else(|| FlexPluginsError::ScriptFailed {
                script: "start".into(),
                reason: format!("no free port at or above {start}"),
            })
    }
}
