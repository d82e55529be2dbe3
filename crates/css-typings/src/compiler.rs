//! The SCSS/SASS compiler capability.

use camino::Utf8Path;
use sass_runner::{SassError, SassRunner, SassSyntax};

/// Compiles SCSS/SASS source to CSS.
pub trait SassCompiler: Send + Sync {
    /// Compiles `source`, which was read from (or is destined for) `path`.
    fn compile(&self, source: &str, syntax: SassSyntax, path: &Utf8Path)
        -> Result<String, SassError>;
}

impl SassCompiler for SassRunner {
    fn compile(
        &self,
        source: &str,
        syntax: SassSyntax,
        path: &Utf8Path,
    ) -> Result<String, SassError> {
        // Relative imports resolve against the stylesheet's own directory.
        let load_path = path.parent().filter(|dir| !dir.as_str().is_empty());
        SassRunner::compile(self, source, syntax, load_path)
    }
}

/// Stands in for the compiler when no `sass` binary could be found.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableCompiler;

impl SassCompiler for UnavailableCompiler {
    fn compile(&self, _: &str, _: SassSyntax, _: &Utf8Path) -> Result<String, SassError> {
        Err(SassError::NotFound)
    }
}
