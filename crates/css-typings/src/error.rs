//! Error types for typings generation.

use camino::Utf8PathBuf;
use thiserror::Error;

/// An error that stops typings generation for a file or a directory walk.
#[derive(Debug, Error)]
pub enum TypingsError {
    /// The file extension is not `css`, `scss` or `sass`.
    #[error("{path}: invalid stylesheet type `{extension}`")]
    UnsupportedDialect {
        path: Utf8PathBuf,
        extension: String,
    },

    /// The stylesheet (or the compiler's output for it) is not valid CSS.
    #[error("{path}:{line}:{column}: {message}")]
    ParseFailure {
        path: Utf8PathBuf,
        line: u32,
        column: u32,
        message: String,
    },

    /// The SCSS/SASS compiler is missing or rejected the stylesheet.
    #[error("{path}: failed to compile stylesheet: {source}")]
    CompileFailure {
        path: Utf8PathBuf,
        source: sass_runner::SassError,
    },

    /// A file vanished between listing its directory and reading it.
    #[error("file {path} no longer exists")]
    MissingFile { path: Utf8PathBuf },

    /// A stylesheet could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    /// Directory traversal failed.
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: Utf8PathBuf,
        source: walkdir::Error,
    },

    /// The exclude pattern is not a valid regular expression.
    #[error("invalid exclude pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}
