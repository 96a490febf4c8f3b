//! Diagnostic sink: where the executor reports what it finds.

use tracing::warn;

/// One finding, keyed by the source line it was attributed to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub struct Diagnostic {
    pub line: u32,
    pub message: String,
}

/// Destination for diagnostics emitted during a path exploration.
///
/// Object-safe so the explorer can carry `&mut dyn DiagnosticSink`
/// without committing to a concrete sink type; `CollectingSink` is what
/// the CLI and tests use, `TracingSink` is for callers who just want the
/// findings to show up in their log stream.
pub trait DiagnosticSink {
    fn report(&mut self, line: u32, message: String);
}

/// Collects diagnostics, deduplicated by source line: the first report
/// for a given line wins, later ones for the same line are dropped. This
/// matches the spec's stance that a line with both a null-dereference
/// and a tautology finding should surface whichever the explorer reaches
/// first, not both.
#[derive(Debug, Default)]
pub struct CollectingSink {
    seen_lines: std::collections::BTreeSet<u32>,
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics in source-line order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, line: u32, message: String) {
        if !self.seen_lines.insert(line) {
            return;
        }
        let pos = self.diagnostics.partition_point(|d| d.line < line);
        self.diagnostics.insert(pos, Diagnostic { line, message });
    }
}

/// Forwards every report to `tracing::warn!` before delegating to an
/// inner sink, so diagnostics show up in a structured log stream as well
/// as in whatever the inner sink collects.
pub struct TracingSink<S> {
    inner: S,
}

impl<S: DiagnosticSink> TracingSink<S> {
    pub fn new(inner: S) -> Self {
        TracingSink { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: DiagnosticSink> DiagnosticSink for TracingSink<S> {
    fn report(&mut self, line: u32, message: String) {
        warn!(line, %message, "diagnostic");
        self.inner.report(line, message);
    }
}
