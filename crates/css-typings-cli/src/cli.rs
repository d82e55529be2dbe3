//! CLI argument parsing.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use css_typings::GeneratorConfig;

/// Generate TypeScript typings for CSS modules.
#[derive(Debug, Parser)]
#[command(name = "css-typings")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Workspace root (config file and node_modules lookup)
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Directory to scan for module stylesheets (defaults to the workspace)
    #[arg(long = "styles-dir")]
    pub styles_dir: Option<Utf8PathBuf>,

    /// Regular expression for directories to skip
    #[arg(long = "exclude-dirs")]
    pub exclude_dirs: Option<String>,

    /// Path to css-typings.json
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Do not run prettier over generated typings
    #[arg(long = "no-format")]
    pub no_format: bool,

    /// Print typings to stdout instead of writing files
    #[arg(long)]
    pub emit: bool,

    /// Watch mode
    #[arg(long)]
    pub watch: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Args {
    /// Applies the command line on top of `file`.
    ///
    /// Paths from the file are relative to `workspace`; paths from the
    /// command line are relative to `cwd`.
    pub fn merge_config(
        &self,
        file: GeneratorConfig,
        cwd: &Utf8Path,
        workspace: &Utf8Path,
    ) -> GeneratorConfig {
        let styles_dir = match &self.styles_dir {
            Some(dir) => Some(resolve(cwd, dir)),
            None => file.styles_dir.map(|dir| resolve(workspace, &dir)),
        };

        GeneratorConfig {
            styles_dir,
            exclude_dirs: self.exclude_dirs.clone().or(file.exclude_dirs),
            format: file.format && !self.no_format,
        }
    }
}

/// Joins `path` onto `base` unless it is already absolute. `.` components
/// are dropped so walked paths match the ones the watcher reports.
pub fn resolve(base: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    joined.components().collect()
}
