//! Directory walking.

use crate::generator::{Generated, TypingsGenerator};
use crate::TypingsError;
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::io::ErrorKind;
use walkdir::{DirEntry, WalkDir};

/// What a directory walk did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Typings files submitted, in walk order.
    pub generated: Vec<Utf8PathBuf>,
    /// Directories pruned by the exclude pattern.
    pub excluded: Vec<Utf8PathBuf>,
}

impl TypingsGenerator {
    /// Generates typings for every module stylesheet under `root`.
    ///
    /// The walk is depth-first and sorted by file name. Directories whose
    /// path matches `exclude` (the root included) are skipped entirely.
    /// The first error aborts the walk.
    pub fn generate_from_directory(
        &self,
        root: &Utf8Path,
        exclude: Option<&Regex>,
    ) -> Result<WalkSummary, TypingsError> {
        let mut summary = WalkSummary::default();
        let mut excluded = Vec::new();

        let entries = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if is_excluded(entry, exclude) {
                    tracing::debug!(dir = %entry.path().display(), "excluded directory");
                    excluded.push(Utf8PathBuf::from(entry.path().to_string_lossy().into_owned()));
                    return false;
                }
                true
            });

        for entry in entries {
            let entry = entry.map_err(|error| walk_error(root, error))?;
            if entry.file_type().is_dir() {
                continue;
            }

            let Some(path) = Utf8Path::from_path(entry.path()) else {
                tracing::debug!(path = %entry.path().display(), "skipping non UTF-8 path");
                continue;
            };
            if !self.pattern().is_module_stylesheet(path) {
                continue;
            }

            let content = std::fs::read_to_string(path).map_err(|source| {
                if source.kind() == ErrorKind::NotFound {
                    TypingsError::MissingFile {
                        path: path.to_path_buf(),
                    }
                } else {
                    TypingsError::Read {
                        path: path.to_path_buf(),
                        source,
                    }
                }
            })?;

            if let Generated::Submitted { target, .. } = self.generate(&content, path)? {
                summary.generated.push(target);
            }
        }

        summary.excluded = excluded;
        Ok(summary)
    }
}

fn is_excluded(entry: &DirEntry, exclude: Option<&Regex>) -> bool {
    match exclude {
        Some(pattern) if entry.file_type().is_dir() => {
            pattern.is_match(&entry.path().to_string_lossy())
        }
        _ => false,
    }
}

fn walk_error(root: &Utf8Path, error: walkdir::Error) -> TypingsError {
    let path = error
        .path()
        .map(|path| Utf8PathBuf::from(path.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.to_path_buf());

    if error.io_error().map(|e| e.kind()) == Some(ErrorKind::NotFound) {
        TypingsError::MissingFile { path }
    } else {
        TypingsError::Walk {
            path,
            source: error,
        }
    }
}
