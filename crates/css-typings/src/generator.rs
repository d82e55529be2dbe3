//! Typings generation for a single stylesheet.

use crate::compiler::{SassCompiler, UnavailableCompiler};
use crate::extract::SelectorExtractor;
use crate::format::{Formatter, Passthrough, Prettier};
use crate::pattern::ModulePattern;
use crate::render::render_typings;
use crate::writer::{typings_path, WriteRequest, WriteSink};
use crate::TypingsError;
use camino::{Utf8Path, Utf8PathBuf};
use sass_runner::SassRunner;
use std::sync::Arc;

/// The external capabilities a generator uses.
#[derive(Clone)]
pub struct Toolchain {
    /// Compiles SCSS/SASS to CSS.
    pub compiler: Arc<dyn SassCompiler>,
    /// Formats the rendered typings.
    pub formatter: Arc<dyn Formatter>,
    /// Receives the finished files.
    pub sink: Arc<dyn WriteSink>,
}

impl Toolchain {
    /// Bundles the given capabilities.
    pub fn new(
        compiler: Arc<dyn SassCompiler>,
        formatter: Arc<dyn Formatter>,
        sink: Arc<dyn WriteSink>,
    ) -> Self {
        Self {
            compiler,
            formatter,
            sink,
        }
    }

    /// Looks up `sass` and (if `format` is set) `prettier` in the workspace
    /// node_modules/.bin, then on PATH.
    ///
    /// A missing compiler makes SCSS/SASS files fail with `CompileFailure`;
    /// a missing formatter leaves output unformatted.
    pub fn detect(workspace: Option<&Utf8Path>, format: bool, sink: Arc<dyn WriteSink>) -> Self {
        let compiler: Arc<dyn SassCompiler> = match SassRunner::detect(workspace) {
            Ok(runner) => {
                tracing::debug!(sass = %runner.sass_path(), "using sass compiler");
                Arc::new(runner)
            }
            Err(error) => {
                tracing::debug!(%error, "SCSS/SASS modules will fail to compile");
                Arc::new(UnavailableCompiler)
            }
        };

        let formatter: Arc<dyn Formatter> = match format.then(|| Prettier::detect(workspace)) {
            Some(Some(prettier)) => {
                tracing::debug!(prettier = %prettier.prettier_path(), "using prettier");
                Arc::new(prettier)
            }
            _ => Arc::new(Passthrough),
        };

        Self::new(compiler, formatter, sink)
    }
}

impl std::fmt::Debug for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolchain").finish_non_exhaustive()
    }
}

/// The outcome of [`TypingsGenerator::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generated {
    /// The file is not a module stylesheet; nothing was done.
    Skipped,
    /// Typings were rendered and handed to the sink.
    Submitted {
        /// Where the typings will be written.
        target: Utf8PathBuf,
        /// The exported names, in output order.
        selectors: Vec<String>,
    },
}

/// Generates `<stylesheet>.d.ts` files for CSS modules.
#[derive(Debug, Clone)]
pub struct TypingsGenerator {
    pattern: ModulePattern,
    extractor: SelectorExtractor,
    toolchain: Toolchain,
}

impl TypingsGenerator {
    /// Creates a generator using `toolchain`.
    pub fn new(toolchain: Toolchain) -> Self {
        Self {
            pattern: ModulePattern,
            extractor: SelectorExtractor::new(Arc::clone(&toolchain.compiler)),
            toolchain,
        }
    }

    /// Returns the module file pattern.
    pub fn pattern(&self) -> &ModulePattern {
        &self.pattern
    }

    /// Generates typings for a stylesheet with contents `content` at `path`.
    ///
    /// Files that are not module stylesheets are skipped. The typings are
    /// submitted to the sink; write failures are not reported here.
    pub fn generate(&self, content: &str, path: &Utf8Path) -> Result<Generated, TypingsError> {
        if !self.pattern.is_module_stylesheet(path) {
            tracing::debug!(path = %path, "not a module stylesheet, skipping");
            return Ok(Generated::Skipped);
        }

        let selectors = self.extractor.extract(content, path)?;
        let rendered = render_typings(&selectors);

        let target = typings_path(path);
        let contents = match self.toolchain.formatter.format(&rendered, &target) {
            Ok(formatted) => formatted,
            Err(error) => {
                tracing::debug!(target_file = %target, %error, "formatting failed, writing unformatted typings");
                rendered
            }
        };

        tracing::info!(target_file = %target, selectors = selectors.len(), "generated typings");
        self.toolchain.sink.submit(WriteRequest {
            target: target.clone(),
            contents,
        });

        Ok(Generated::Submitted { target, selectors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<WriteRequest>>);

    impl WriteSink for RecordingSink {
        fn submit(&self, request: WriteRequest) {
            self.0.lock().unwrap().push(request);
        }
    }

    struct FailingFormatter;

    impl Formatter for FailingFormatter {
        fn format(&self, _: &str, _: &Utf8Path) -> Result<String, FormatError> {
            Err(FormatError::ProcessFailed {
                code: 2,
                stderr: "SyntaxError".to_string(),
            })
        }
    }

    struct UppercaseFormatter;

    impl Formatter for UppercaseFormatter {
        fn format(&self, text: &str, _: &Utf8Path) -> Result<String, FormatError> {
            Ok(text.to_uppercase())
        }
    }

    fn generator(formatter: Arc<dyn Formatter>) -> (TypingsGenerator, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let toolchain = Toolchain::new(Arc::new(UnavailableCompiler), formatter, sink.clone());
        (TypingsGenerator::new(toolchain), sink)
    }

    #[test]
    fn test_generate_module() {
        let (generator, sink) = generator(Arc::new(Passthrough));
        let result = generator
            .generate(".foo { color: red } #bar {}", Utf8Path::new("x.module.css"))
            .unwrap();

        assert_eq!(
            result,
            Generated::Submitted {
                target: Utf8PathBuf::from("x.module.css.d.ts"),
                selectors: vec!["foo".to_string(), "bar".to_string()],
            }
        );

        let requests = sink.0.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].target.as_str(), "x.module.css.d.ts");
        insta::assert_snapshot!(requests[0].contents.as_str(), @r###"
        // AUTO-GENERATED
        interface CSSExports { 'foo': string; 'bar': string; }
        export const exports: CSSExports;
        export default exports;
        "###);
    }

    #[test]
    fn test_non_module_is_skipped() {
        let (generator, sink) = generator(Arc::new(Passthrough));
        let result = generator
            .generate(".foo {}", Utf8Path::new("x.css"))
            .unwrap();
        assert_eq!(result, Generated::Skipped);
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_skip_happens_before_parsing() {
        let (generator, _) = generator(Arc::new(Passthrough));
        let result = generator
            .generate("this is { not css", Utf8Path::new("notes.txt"))
            .unwrap();
        assert_eq!(result, Generated::Skipped);
    }

    #[test]
    fn test_formatter_output_is_written() {
        let (generator, sink) = generator(Arc::new(UppercaseFormatter));
        generator
            .generate(".a {}", Utf8Path::new("x.module.css"))
            .unwrap();
        assert!(sink.0.lock().unwrap()[0]
            .contents
            .starts_with("// AUTO-GENERATED\nINTERFACE CSSEXPORTS"));
    }

    #[test]
    fn test_formatter_failure_falls_back() {
        let (generator, sink) = generator(Arc::new(FailingFormatter));
        generator
            .generate(".a {}", Utf8Path::new("x.module.css"))
            .unwrap();
        assert_eq!(
            sink.0.lock().unwrap()[0].contents,
            render_typings(&["a"])
        );
    }

    #[test]
    fn test_errors_propagate_without_output() {
        let (generator, sink) = generator(Arc::new(Passthrough));
        let err = generator
            .generate("..a {}", Utf8Path::new("x.module.css"))
            .unwrap_err();
        assert!(matches!(err, TypingsError::ParseFailure { .. }));
        assert!(sink.0.lock().unwrap().is_empty());
    }
}
