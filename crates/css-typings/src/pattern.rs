//! Module stylesheet file matching.

use camino::Utf8Path;

const MODULE_SUFFIXES: [&str; 3] = [".module.css", ".module.scss", ".module.sass"];

/// Decides which files are CSS modules that get typings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModulePattern;

impl ModulePattern {
    /// Returns true if `path` ends in `.module.css`, `.module.scss` or
    /// `.module.sass`.
    pub fn is_module_stylesheet(&self, path: &Utf8Path) -> bool {
        let path = path.as_str();
        MODULE_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_stylesheets() {
        let pattern = ModulePattern;
        assert!(pattern.is_module_stylesheet(Utf8Path::new("src/button.module.css")));
        assert!(pattern.is_module_stylesheet(Utf8Path::new("button.module.scss")));
        assert!(pattern.is_module_stylesheet(Utf8Path::new("/abs/nav.module.sass")));
    }

    #[test]
    fn test_other_files() {
        let pattern = ModulePattern;
        assert!(!pattern.is_module_stylesheet(Utf8Path::new("src/global.css")));
        assert!(!pattern.is_module_stylesheet(Utf8Path::new("button.module.css.d.ts")));
        assert!(!pattern.is_module_stylesheet(Utf8Path::new("button.module.less")));
        assert!(!pattern.is_module_stylesheet(Utf8Path::new("button.module.CSS")));
        assert!(!pattern.is_module_stylesheet(Utf8Path::new("module.css")));
    }
}
