//! Terminal output.

use css_typings::{WalkSummary, WriteFailure, WriteLog, WriteRequest, WriteSink};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// Prints typings to stdout instead of writing them (`--emit`).
pub struct StdoutSink {
    log: Arc<dyn WriteLog>,
}

impl StdoutSink {
    pub fn new(log: Arc<dyn WriteLog>) -> Self {
        Self { log }
    }
}

impl WriteSink for StdoutSink {
    fn submit(&self, request: WriteRequest) {
        let mut stdout = std::io::stdout().lock();
        let result = writeln!(stdout, "// {}\n{}\n", request.target, request.contents.trim_end())
            .and_then(|_| stdout.flush());
        if let Err(source) = result {
            self.log.report(WriteFailure {
                target: request.target,
                source,
            });
        }
    }
}

/// Result of a one-shot run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub generated: usize,
    pub excluded: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(walk: &WalkSummary, elapsed: Duration) -> Self {
        Self {
            generated: walk.generated.len(),
            excluded: walk.excluded.len(),
            elapsed,
        }
    }

    /// One-line summary for the terminal.
    pub fn format(&self) -> String {
        let mut line = format!(
            "Generated {} typings {}",
            self.generated,
            plural(self.generated, "file", "files")
        );
        if self.excluded > 0 {
            line.push_str(&format!(
                " ({} {} excluded)",
                self.excluded,
                plural(self.excluded, "directory", "directories")
            ));
        }
        line.push_str(&format!(" in {}ms", self.elapsed.as_millis()));
        line
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_format() {
        let summary = RunSummary {
            generated: 3,
            excluded: 1,
            elapsed: Duration::from_millis(12),
        };
        assert_eq!(
            summary.format(),
            "Generated 3 typings files (1 directory excluded) in 12ms"
        );
    }

    #[test]
    fn test_summary_singular_without_exclusions() {
        let summary = RunSummary {
            generated: 1,
            excluded: 0,
            elapsed: Duration::from_millis(0),
        };
        assert_eq!(summary.format(), "Generated 1 typings file in 0ms");
    }
}
