// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Subprocess execution with combined output capture.
//!
//! Invocations are strictly sequential and block (await) until the child
//! exits; there is no timeout and no internal cancellation. Interruption is
//! the operator's business.

use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, trace};

use crate::error::{ProcessError, XcbResult};

/// Builder for configuring and running a toolchain subprocess.
#[derive(Debug)]
pub struct ProcessBuilder {
    /// Path to the executable.
    program: PathBuf,
    /// Command-line arguments.
    args: Vec<String>,
    /// Combined stdout+stderr capture destination.
    log_file: Option<PathBuf>,
    /// Echo the command line and its output to the console.
    echo: bool,
    /// Don't fail on a non-zero exit status.
    allow_failure: bool,
    /// Display name for logging.
    name: Option<String>,
}

impl ProcessBuilder {
    /// Creates a new `ProcessBuilder` for the given program.
    ///
    /// The program can be an absolute path, relative path, or just the
    /// executable name resolved through PATH at spawn time.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            log_file: None,
            echo: false,
            allow_failure: false,
            name: None,
        }
    }

    /// Creates a `ProcessBuilder` after resolving the program via PATH.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError::ExecutableNotFound` if the executable is not
    /// found in PATH.
    pub fn which(program: &str) -> std::result::Result<Self, ProcessError> {
        which::which(program).map_or_else(
            |_| {
                Err(ProcessError::ExecutableNotFound {
                    name: program.to_string(),
                })
            },
            |path| Ok(Self::new(path)),
        )
    }

    /// Adds an argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments to the command.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for arg in args {
            self.args.push(arg.into());
        }
        self
    }

    /// Capture combined stdout+stderr to the given file, overwriting it.
    #[must_use]
    pub fn log_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Echo the command line and its output to the console as it arrives.
    #[must_use]
    pub const fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Don't fail if the process exits with a non-zero status.
    #[must_use]
    pub const fn allow_failure(mut self) -> Self {
        self.allow_failure = true;
        self
    }

    /// Sets a display name for logging.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the display name for this process.
    fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.program.file_stem().map_or_else(
                || "process".to_string(),
                |stem| stem.to_string_lossy().into_owned(),
            )
        })
    }

    /// Returns the full command line as a string (for logging).
    fn command_line(&self) -> String {
        let mut cmd = format!("{}", self.program.display());
        for arg in &self.args {
            use std::fmt::Write as _;
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns the process and waits for completion, capturing combined
    /// output into the configured log file.
    ///
    /// Returns the exit code.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Spawning the child process fails.
    /// - The process exits with a non-zero status (and `allow_failure` is
    ///   not set).
    /// - The log file cannot be written.
    pub async fn run(self) -> XcbResult<i32> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if self.echo {
            info!(cmd = %cmd_line, "running");
        } else {
            debug!(cmd = %cmd_line, "exec");
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| ProcessError::SpawnFailed {
                command: cmd_line.clone(),
                source: e,
            })?;

        trace!(process = %name, pid = ?child.id(), "spawned");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (out, err) = tokio::join!(drain(stdout, self.echo), drain(stderr, self.echo));

        let status = child.wait().await.map_err(|e| ProcessError::SpawnFailed {
            command: cmd_line.clone(),
            source: e,
        })?;
        let code = status.code().unwrap_or(-1);

        if let Some(log_file) = &self.log_file {
            let mut combined = out;
            combined.push_str(&err);
            tokio::fs::write(log_file, combined).await?;
        }

        if !self.allow_failure && code != 0 {
            return Err(ProcessError::NonZeroExit {
                command: name,
                code,
            }
            .into());
        }

        trace!(process = %name, exit_code = code, "completed");
        Ok(code)
    }

    /// Runs the process quietly and returns its trimmed stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if spawning fails or the process exits non-zero
    /// (and `allow_failure` is not set).
    pub async fn output(self) -> XcbResult<String> {
        let name = self.display_name();
        let cmd_line = self.command_line();
        debug!(cmd = %cmd_line, "exec");

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|e| ProcessError::SpawnFailed {
                command: cmd_line,
                source: e,
            })?;

        let code = output.status.code().unwrap_or(-1);
        if !self.allow_failure && code != 0 {
            return Err(ProcessError::NonZeroExit {
                command: name,
                code,
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Collect a child stream line by line, echoing as lines arrive when asked.
async fn drain<R: AsyncRead + Unpin>(stream: Option<R>, echo: bool) -> String {
    let Some(stream) = stream else {
        return String::new();
    };

    let mut lines = BufReader::new(stream).lines();
    let mut buf = String::new();
    while let Ok(Some(line)) = lines.next_line().await {
        if echo {
            println!("{line}");
        }
        buf.push_str(&line);
        buf.push('\n');
    }
    buf
}
