//! Stylesheet dialects.

use crate::TypingsError;
use camino::Utf8Path;
use sass_runner::SassSyntax;

/// The language a stylesheet is written in, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Css,
    Scss,
    Sass,
}

impl Dialect {
    /// Returns the dialect for a (case-sensitive) file extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "css" => Some(Dialect::Css),
            "scss" => Some(Dialect::Scss),
            "sass" => Some(Dialect::Sass),
            _ => None,
        }
    }

    /// Returns the dialect of the stylesheet at `path`.
    pub fn from_path(path: &Utf8Path) -> Result<Self, TypingsError> {
        let extension = path.extension().unwrap_or_default();
        Self::from_extension(extension).ok_or_else(|| TypingsError::UnsupportedDialect {
            path: path.to_path_buf(),
            extension: extension.to_string(),
        })
    }

    /// Returns the compiler syntax, or `None` for plain CSS.
    pub fn sass_syntax(self) -> Option<SassSyntax> {
        match self {
            Dialect::Css => None,
            Dialect::Scss => Some(SassSyntax::Scss),
            Dialect::Sass => Some(SassSyntax::Indented),
        }
    }
}

/// A stylesheet handed in for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylesheetSource<'a> {
    pub content: &'a str,
    pub path: &'a Utf8Path,
    pub dialect: Dialect,
}

impl<'a> StylesheetSource<'a> {
    /// Pairs `content` with its path, deriving the dialect from the extension.
    pub fn new(content: &'a str, path: &'a Utf8Path) -> Result<Self, TypingsError> {
        Ok(Self {
            content,
            path,
            dialect: Dialect::from_path(path)?,
        })
    }
}
