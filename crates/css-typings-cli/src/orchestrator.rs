//! Main orchestration logic.

use crate::cli::{resolve, Args};
use crate::output::{RunSummary, StdoutSink};
use camino::{Utf8Path, Utf8PathBuf};
use css_typings::{
    BackgroundWriter, Generated, GeneratorConfig, ModulePattern, Toolchain, TracingLog,
    TypingsError, TypingsGenerator, WriteLog, WriteSink,
};
use miette::Diagnostic;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Orchestration errors.
#[derive(Debug, Error, Diagnostic)]
pub enum OrchestratorError {
    /// Typings generation failed.
    #[error(transparent)]
    #[diagnostic(code(css_typings::generate))]
    Typings(#[from] TypingsError),

    /// The working directory is not usable.
    #[error("invalid working directory: {0}")]
    #[diagnostic(code(css_typings::workspace))]
    InvalidWorkspace(String),

    /// Watch error.
    #[error("watch error: {0}")]
    #[diagnostic(code(css_typings::watch))]
    WatchFailed(String),
}

/// Generates typings for the styles directory, then watches it if asked.
pub async fn run(args: Args) -> Result<RunSummary, OrchestratorError> {
    let cwd = std::env::current_dir()
        .map_err(|e| OrchestratorError::InvalidWorkspace(e.to_string()))
        .and_then(|dir| {
            Utf8PathBuf::try_from(dir)
                .map_err(|e| OrchestratorError::InvalidWorkspace(e.to_string()))
        })?;
    let workspace = resolve(&cwd, &args.workspace);

    let file_config = match &args.config {
        Some(path) => GeneratorConfig::load_file(&resolve(&cwd, path)),
        None => GeneratorConfig::load(&workspace),
    };
    let config = args.merge_config(file_config, &cwd, &workspace);
    let exclude = config.exclude_pattern()?;
    let styles_dir = config
        .styles_dir
        .clone()
        .unwrap_or_else(|| workspace.clone());

    let log: Arc<dyn WriteLog> = Arc::new(TracingLog);
    let writer = Arc::new(BackgroundWriter::new(Arc::clone(&log)));
    let sink: Arc<dyn WriteSink> = if args.emit {
        Arc::new(StdoutSink::new(log))
    } else {
        writer.clone()
    };
    let generator = TypingsGenerator::new(Toolchain::detect(Some(&workspace), config.format, sink));

    let start = Instant::now();
    let walk = generator.generate_from_directory(&styles_dir, exclude.as_ref())?;
    let summary = RunSummary::new(&walk, start.elapsed());

    if args.watch {
        eprintln!("{}", summary.format());
        return run_watch_mode(&generator, &styles_dir, exclude.as_ref()).await;
    }

    writer.finish();
    if args.emit {
        eprintln!("{}", summary.format());
    } else {
        println!("{}", summary.format());
    }
    Ok(summary)
}

/// Runs in watch mode.
async fn run_watch_mode(
    generator: &TypingsGenerator,
    styles_dir: &Utf8Path,
    exclude: Option<&Regex>,
) -> Result<RunSummary, OrchestratorError> {
    use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
    use std::time::Duration;

    // Set up file watcher with tokio channel
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )
    .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    watcher
        .watch(styles_dir.as_std_path(), RecursiveMode::Recursive)
        .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    eprintln!("Watching {} for changes... (Ctrl+C to stop)", styles_dir);

    while let Some(event) = rx.recv().await {
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            continue;
        }

        let paths: Vec<&std::path::Path> = event.paths.iter().map(|p| p.as_path()).collect();
        for path in changed_stylesheets(&paths, generator.pattern(), styles_dir, exclude) {
            regenerate(generator, &path);
        }
    }

    Err(OrchestratorError::WatchFailed(
        "watch channel closed unexpectedly".to_string(),
    ))
}

/// Picks the module stylesheets out of an event's paths, dropping anything
/// inside an excluded directory.
fn changed_stylesheets(
    paths: &[&std::path::Path],
    pattern: &ModulePattern,
    root: &Utf8Path,
    exclude: Option<&Regex>,
) -> Vec<Utf8PathBuf> {
    let mut changed: Vec<Utf8PathBuf> = Vec::new();
    for path in paths {
        let Some(path) = Utf8Path::from_path(path) else {
            continue;
        };
        if !pattern.is_module_stylesheet(path) || in_excluded_dir(path, root, exclude) {
            continue;
        }
        if !changed.iter().any(|seen| seen.as_path() == path) {
            changed.push(path.to_path_buf());
        }
    }
    changed
}

fn in_excluded_dir(path: &Utf8Path, root: &Utf8Path, exclude: Option<&Regex>) -> bool {
    let Some(exclude) = exclude else {
        return false;
    };
    path.ancestors()
        .skip(1)
        .take_while(|dir| dir.starts_with(root))
        .any(|dir| exclude.is_match(dir.as_str()))
}

/// Regenerates one file. Failures are reported and watching continues.
fn regenerate(generator: &TypingsGenerator, path: &Utf8Path) {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path, "changed file no longer exists");
            return;
        }
        Err(e) => {
            eprintln!("Error: failed to read {}: {}", path, e);
            return;
        }
    };

    match generator.generate(&content, path) {
        Ok(Generated::Submitted { target, .. }) => println!("Updated {}", target),
        Ok(Generated::Skipped) => {}
        Err(e) => eprintln!("Error: {}", e),
    }
}
