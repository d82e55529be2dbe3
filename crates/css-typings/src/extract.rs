//! Selector extraction.

use crate::compiler::SassCompiler;
use crate::dialect::StylesheetSource;
use crate::TypingsError;
use camino::Utf8Path;
use indexmap::IndexSet;
use lightningcss::selector::{Component, Selector};
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::visit_types;
use lightningcss::visitor::{Visit, VisitTypes, Visitor};
use std::convert::Infallible;
use std::sync::Arc;

/// Extracts the class and id names a stylesheet defines.
#[derive(Clone)]
pub struct SelectorExtractor {
    compiler: Arc<dyn SassCompiler>,
}

impl SelectorExtractor {
    /// Creates an extractor that compiles SCSS/SASS with `compiler`.
    pub fn new(compiler: Arc<dyn SassCompiler>) -> Self {
        Self { compiler }
    }

    /// Returns every distinct class and id name in `content`, in order of
    /// first appearance.
    ///
    /// The dialect comes from the extension of `path`. SCSS/SASS content is
    /// compiled to CSS first.
    pub fn extract(&self, content: &str, path: &Utf8Path) -> Result<Vec<String>, TypingsError> {
        let source = StylesheetSource::new(content, path)?;

        let compiled;
        let css = match source.dialect.sass_syntax() {
            None => source.content,
            Some(syntax) => {
                compiled = self
                    .compiler
                    .compile(source.content, syntax, source.path)
                    .map_err(|error| TypingsError::CompileFailure {
                        path: path.to_path_buf(),
                        source: error,
                    })?;
                compiled.as_str()
            }
        };

        let mut stylesheet = StyleSheet::parse(css, ParserOptions::default()).map_err(|error| {
            // lightningcss lines are zero-based, columns one-based.
            let (line, column) = error
                .loc
                .as_ref()
                .map_or((1, 1), |loc| (loc.line + 1, loc.column));
            TypingsError::ParseFailure {
                path: path.to_path_buf(),
                line,
                column,
                message: error.kind.to_string(),
            }
        })?;

        Ok(collect_selectors(&mut stylesheet))
    }
}

impl std::fmt::Debug for SelectorExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorExtractor").finish_non_exhaustive()
    }
}

/// Collects class and id names from a parsed stylesheet, deduplicated in
/// source order.
pub fn collect_selectors(stylesheet: &mut StyleSheet<'_>) -> Vec<String> {
    let mut collector = SelectorCollector::default();
    if let Err(never) = stylesheet.visit(&mut collector) {
        match never {}
    }
    collector.names.into_iter().collect()
}

#[derive(Default)]
struct SelectorCollector {
    names: IndexSet<String>,
}

impl SelectorCollector {
    /// Records the names in one complex selector, left to right.
    fn record(&mut self, selector: &Selector<'_>) {
        // Match order stores compounds right to left, each compound in
        // source order.
        let components = selector.iter_raw_match_order().as_slice();
        for compound in components
            .split(|component| matches!(component, Component::Combinator(_)))
            .rev()
        {
            for component in compound {
                self.record_component(component);
            }
        }
    }

    fn record_component(&mut self, component: &Component<'_>) {
        match component {
            Component::Class(name) | Component::ID(name) => {
                if !self.names.contains(&*name.0) {
                    self.names.insert(name.0.to_string());
                }
            }
            Component::Negation(selectors)
            | Component::Is(selectors)
            | Component::Where(selectors)
            | Component::Has(selectors)
            | Component::Any(_, selectors) => {
                for selector in selectors.iter() {
                    self.record(selector);
                }
            }
            Component::NthOf(nth) => {
                for selector in nth.selectors() {
                    self.record(selector);
                }
            }
            Component::Slotted(selector) | Component::Host(Some(selector)) => {
                self.record(selector);
            }
            _ => {}
        }
    }
}

impl<'i> Visitor<'i> for SelectorCollector {
    type Error = Infallible;

    fn visit_types(&self) -> VisitTypes {
        visit_types!(SELECTORS)
    }

    fn visit_selector(&mut self, selector: &mut Selector<'i>) -> Result<(), Self::Error> {
        self.record(selector);
        Ok(())
    }
}
