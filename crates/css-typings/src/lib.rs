//! TypeScript typings for CSS modules.
//!
//! This crate generates a `<stylesheet>.d.ts` file for every
//! `*.module.css`, `*.module.scss` and `*.module.sass` file. It handles:
//! - Compiling SCSS/SASS to CSS through the `sass` CLI
//! - Extracting class and id selectors from the parsed CSS
//! - Rendering and (optionally) formatting the declaration file
//! - Writing output off the caller's thread
//!
//! # Example
//!
//! ```
//! use camino::Utf8Path;
//! use css_typings::{render_typings, SelectorExtractor, UnavailableCompiler};
//! use std::sync::Arc;
//!
//! let extractor = SelectorExtractor::new(Arc::new(UnavailableCompiler));
//! let selectors = extractor
//!     .extract(".button { color: red } #main .button:hover {}", Utf8Path::new("app.module.css"))
//!     .unwrap();
//! assert_eq!(selectors, ["button", "main"]);
//!
//! let typings = render_typings(&selectors);
//! assert!(typings.contains("interface CSSExports { 'button': string; 'main': string; }"));
//! ```

mod compiler;
mod config;
mod dialect;
mod error;
mod extract;
mod format;
mod generator;
mod pattern;
mod render;
mod walk;
mod writer;

pub use compiler::{SassCompiler, UnavailableCompiler};
pub use config::{GeneratorConfig, CONFIG_FILE};
pub use dialect::{Dialect, StylesheetSource};
pub use error::TypingsError;
pub use extract::{collect_selectors, SelectorExtractor};
pub use format::{FormatError, Formatter, Passthrough, Prettier};
pub use generator::{Generated, Toolchain, TypingsGenerator};
pub use pattern::ModulePattern;
pub use render::{render_typings, HEADER};
pub use walk::WalkSummary;
pub use writer::{
    typings_path, BackgroundWriter, TracingLog, WriteFailure, WriteLog, WriteRequest, WriteSink,
};

/// Creates a generator from `config`.
///
/// If `config.styles_dir` is set, typings for every module stylesheet under
/// it are generated before returning.
pub fn setup(config: &GeneratorConfig, toolchain: Toolchain) -> Result<TypingsGenerator, TypingsError> {
    let exclude = config.exclude_pattern()?;
    let generator = TypingsGenerator::new(toolchain);

    if let Some(styles_dir) = &config.styles_dir {
        let summary = generator.generate_from_directory(styles_dir, exclude.as_ref())?;
        tracing::info!(
            dir = %styles_dir,
            generated = summary.generated.len(),
            "generated typings for styles directory"
        );
    }

    Ok(generator)
}
