//! Dart Sass process runner for SCSS/SASS stylesheets.

mod runner;

pub use runner::{SassError, SassRunner, SassSyntax};
