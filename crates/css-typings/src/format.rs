//! Best-effort formatting of generated typings.

use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Formatter errors. Callers fall back to the unformatted text.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Failed to spawn the formatter process.
    #[error("failed to spawn formatter: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// The formatter exited with an error.
    #[error("formatter exited with code {code}: {stderr}")]
    ProcessFailed { code: i32, stderr: String },

    /// The formatter wrote something that is not UTF-8.
    #[error("formatter produced invalid output: {0}")]
    InvalidOutput(String),
}

/// Formats TypeScript declaration text.
pub trait Formatter: Send + Sync {
    /// Formats `text`, which will be written to `target`.
    fn format(&self, text: &str, target: &Utf8Path) -> Result<String, FormatError>;
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Formatter for Passthrough {
    fn format(&self, text: &str, _target: &Utf8Path) -> Result<String, FormatError> {
        Ok(text.to_string())
    }
}

/// Formats through the `prettier` CLI.
///
/// Prettier runs in the current working directory with `--stdin-filepath`
/// set to the output file, so it resolves the project's own configuration.
#[derive(Debug, Clone)]
pub struct Prettier {
    prettier_path: Utf8PathBuf,
}

impl Prettier {
    /// Creates a formatter for the prettier binary at `prettier_path`.
    pub fn new(prettier_path: Utf8PathBuf) -> Self {
        Self { prettier_path }
    }

    /// Finds prettier and creates a formatter for it.
    pub fn detect(workspace_root: Option<&Utf8Path>) -> Option<Self> {
        Self::find_prettier(workspace_root).map(Self::new)
    }

    /// Attempts to find prettier in the workspace node_modules/.bin, then on PATH.
    pub fn find_prettier(workspace_root: Option<&Utf8Path>) -> Option<Utf8PathBuf> {
        if let Some(workspace) = workspace_root {
            let bin = workspace.join("node_modules/.bin");
            let candidates: &[&str] = if cfg!(windows) {
                &["prettier.cmd", "prettier.exe", "prettier"]
            } else {
                &["prettier"]
            };
            if let Some(path) = candidates
                .iter()
                .map(|candidate| bin.join(candidate))
                .find(|path| path.exists())
            {
                return Some(path);
            }
        }

        which::which("prettier")
            .ok()
            .and_then(|path| Utf8PathBuf::try_from(path).ok())
    }

    /// Returns the path of the prettier binary.
    pub fn prettier_path(&self) -> &Utf8Path {
        &self.prettier_path
    }
}

impl Formatter for Prettier {
    fn format(&self, text: &str, target: &Utf8Path) -> Result<String, FormatError> {
        let mut child = Command::new(&self.prettier_path)
            .arg("--parser")
            .arg("typescript")
            .arg("--stdin-filepath")
            .arg(target.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| FormatError::InvalidOutput("failed to open prettier stdin".to_string()))?;

        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(text.as_bytes()));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (output, written)
        });
        let output = output?;

        if !output.status.success() {
            return Err(FormatError::ProcessFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        String::from_utf8(output.stdout).map_err(|e| FormatError::InvalidOutput(e.to_string()))
    }
}
