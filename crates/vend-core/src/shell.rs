//! Shell command execution for post-sync scripts
//!
//! Scripts are full command lines handed to the platform shell (`sh -c` on
//! Unix, `cmd /C` on Windows) and run in an explicit directory. Output is
//! captured and returned line by line, stdout first, then stderr.

use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use vend_fs::NormalizedPath;

/// Errors from running a shell command
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("'{program}' exited with {}", describe_exit(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        output: Vec<String>,
    },

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' timed out after {timeout:?}")]
    TimedOut {
        program: String,
        timeout: Duration,
        output: Vec<String>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "a signal".to_string(),
    }
}

impl ShellError {
    /// Output captured before the command failed.
    pub fn output(&self) -> &[String] {
        match self {
            Self::Failed { output, .. } | Self::TimedOut { output, .. } => output,
            Self::Spawn { .. } => &[],
        }
    }
}

/// Runs command lines on behalf of the script runner.
pub trait ShellExecutor: Send + Sync {
    /// Run `command_line` through the platform shell inside `dir`.
    ///
    /// Returns the captured output lines on a zero exit status.
    fn run(&self, command_line: &str, dir: &NormalizedPath) -> Result<Vec<String>, ShellError>;
}

/// [`ShellExecutor`] backed by the operating system shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShell {
    timeout: Option<Duration>,
}

impl SystemShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill commands that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl ShellExecutor for SystemShell {
    fn run(&self, command_line: &str, dir: &NormalizedPath) -> Result<Vec<String>, ShellError> {
        tracing::debug!(command = %command_line, dir = %dir, "Running shell command");

        // Sources may be synchronized on plain threads, so each call drives
        // its own single-threaded runtime
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| ShellError::Spawn {
                program: command_line.to_string(),
                source,
            })?;
        let output = runtime.block_on(wait_for(command_line, dir, self.timeout))?;

        let lines = output_lines(&output);
        if output.status.success() {
            Ok(lines)
        } else {
            Err(ShellError::Failed {
                program: command_line.to_string(),
                code: output.status.code(),
                output: lines,
            })
        }
    }
}

/// Spawn `command_line` in `dir` and collect its output, killing it once
/// `limit` elapses.
async fn wait_for(
    command_line: &str,
    dir: &NormalizedPath,
    limit: Option<Duration>,
) -> Result<Output, ShellError> {
    let spawn_error = |source| ShellError::Spawn {
        program: command_line.to_string(),
        source,
    };

    let child = platform_command(command_line)
        .current_dir(dir.to_native())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(spawn_error)?;

    let Some(limit) = limit else {
        return child.wait_with_output().await.map_err(spawn_error);
    };
    match timeout(limit, child.wait_with_output()).await {
        Ok(result) => result.map_err(spawn_error),
        Err(_) => {
            tracing::warn!(command = %command_line, ?limit, "Shell command timed out");
            Err(ShellError::TimedOut {
                program: command_line.to_string(),
                timeout: limit,
                output: vec![format!("timed out after {limit:?}")],
            })
        }
    }
}

#[cfg(windows)]
fn platform_command(command_line: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(command_line);
    command
}

#[cfg(not(windows))]
fn platform_command(command_line: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(command_line);
    command
}

/// Non-empty lines of stdout followed by those of stderr.
fn output_lines(output: &Output) -> Vec<String> {
    [&output.stdout, &output.stderr]
        .into_iter()
        .flat_map(|stream| {
            String::from_utf8_lossy(stream)
                .lines()
                .map(str::trim_end)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}
