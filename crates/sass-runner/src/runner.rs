//! sass process runner.

use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Error types for sass runner.
#[derive(Debug, Error)]
pub enum SassError {
    /// Failed to spawn sass process.
    #[error("failed to spawn sass: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// sass process exited with error.
    #[error("sass exited with code {code}: {stderr}")]
    ProcessFailed { code: i32, stderr: String },

    /// sass binary not found.
    #[error("sass binary not found (install the `sass` npm package or put Dart Sass on PATH)")]
    NotFound,

    /// sass wrote something that is not UTF-8 CSS.
    #[error("sass produced invalid output: {0}")]
    InvalidOutput(String),
}

/// Input syntax for the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SassSyntax {
    /// Brace-delimited `.scss` syntax.
    Scss,
    /// Indentation-based `.sass` syntax.
    Indented,
}

/// The sass runner.
#[derive(Debug, Clone)]
pub struct SassRunner {
    sass_path: Utf8PathBuf,
}

impl SassRunner {
    /// Creates a runner for the sass binary at `sass_path`.
    pub fn new(sass_path: Utf8PathBuf) -> Self {
        Self { sass_path }
    }

    /// Finds sass and creates a runner for it.
    pub fn detect(workspace_root: Option<&Utf8Path>) -> Result<Self, SassError> {
        Self::find_sass(workspace_root)
            .map(Self::new)
            .ok_or(SassError::NotFound)
    }

    /// Attempts to find sass in the workspace or on PATH.
    /// 1. Workspace node_modules/.bin/sass (if workspace_root provided)
    /// 2. PATH
    pub fn find_sass(workspace_root: Option<&Utf8Path>) -> Option<Utf8PathBuf> {
        if let Some(workspace) = workspace_root {
            let bin = workspace.join("node_modules/.bin");
            if let Some(path) = find_sass_in_bin(&bin) {
                return Some(path);
            }
        }

        which::which("sass")
            .ok()
            .and_then(|path| Utf8PathBuf::try_from(path).ok())
    }

    /// Returns the path of the sass binary.
    pub fn sass_path(&self) -> &Utf8Path {
        &self.sass_path
    }

    /// Compiles `source` to CSS.
    ///
    /// The source is piped through stdin, so unsaved content is what gets
    /// compiled. `load_path` is where relative `@use`/`@import` resolve from,
    /// normally the directory of the stylesheet.
    pub fn compile(
        &self,
        source: &str,
        syntax: SassSyntax,
        load_path: Option<&Utf8Path>,
    ) -> Result<String, SassError> {
        let mut command = Command::new(&self.sass_path);
        command
            .arg("--stdin")
            .arg(match syntax {
                SassSyntax::Scss => "--no-indented",
                SassSyntax::Indented => "--indented",
            })
            .arg("--no-source-map")
            .arg("--style=expanded");
        if let Some(load_path) = load_path {
            command.arg(format!("--load-path={}", load_path));
        }

        tracing::debug!(sass = %self.sass_path, ?syntax, "compiling stylesheet");

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SassError::InvalidOutput("failed to open sass stdin".to_string()))?;

        // Feed stdin from a second thread so a large output cannot block us.
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(source.as_bytes()));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (output, written)
        });
        let output = output?;

        if !output.status.success() {
            return Err(SassError::ProcessFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        String::from_utf8(output.stdout).map_err(|e| SassError::InvalidOutput(e.to_string()))
    }
}

fn find_sass_in_bin(bin: &Utf8Path) -> Option<Utf8PathBuf> {
    let candidates: &[&str] = if cfg!(windows) {
        &["sass.cmd", "sass.exe", "sass"]
    } else {
        &["sass"]
    };

    candidates
        .iter()
        .map(|candidate| bin.join(candidate))
        .find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::try_from(path.to_path_buf()).unwrap()
    }

    #[cfg(unix)]
    fn fake_sass(dir: &Utf8Path, script: &str) -> Utf8PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let bin = dir.join("node_modules/.bin");
        std::fs::create_dir_all(&bin).unwrap();
        let path = bin.join("sass");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_find_sass_in_workspace_bin() {
        let temp = tempfile::tempdir().unwrap();
        let root = utf8(temp.path());
        let bin = root.join("node_modules/.bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join(if cfg!(windows) { "sass.cmd" } else { "sass" }), "").unwrap();

        let found = SassRunner::find_sass(Some(&root)).unwrap();
        assert!(found.starts_with(&bin));
    }

    #[test]
    fn test_missing_bin_dir() {
        let temp = tempfile::tempdir().unwrap();
        assert!(find_sass_in_bin(&utf8(temp.path()).join("node_modules/.bin")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_pipes_source_through_stdin() {
        let temp = tempfile::tempdir().unwrap();
        let sass = fake_sass(&utf8(temp.path()), "cat");
        let runner = SassRunner::new(sass);

        let css = runner
            .compile(".a { color: red; }", SassSyntax::Scss, Some(&utf8(temp.path())))
            .unwrap();
        assert_eq!(css, ".a { color: red; }");
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_failure_reports_stderr() {
        let temp = tempfile::tempdir().unwrap();
        let sass = fake_sass(
            &utf8(temp.path()),
            "cat > /dev/null\necho 'Error: expected \"{\".' >&2\nexit 65",
        );
        let runner = SassRunner::new(sass);

        let err = runner.compile(".a {", SassSyntax::Indented, None).unwrap_err();
        match err {
            SassError::ProcessFailed { code, stderr } => {
                assert_eq!(code, 65);
                assert!(stderr.contains("expected"));
            }
            other => panic!("expected ProcessFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_detect_uses_workspace_bin() {
        let temp = tempfile::tempdir().unwrap();
        let root = utf8(temp.path());
        let sass = fake_sass(&root, "cat");

        let runner = SassRunner::detect(Some(&root)).unwrap();
        assert_eq!(runner.sass_path(), sass.as_path());
    }
}
