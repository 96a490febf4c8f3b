//! Executor tuning knobs, plumbed in from the CLI layer.

/// Parameters that shape how aggressively the explorer traverses a CFG.
///
/// Kept intentionally small: this crate does no widening or fixpoint
/// computation, so the only per-run knobs are the loop-termination
/// bound and whether to warn on unconstrained dereferences at all.
#[derive(Debug, Clone, Copy)]
pub struct ExecutorConfig {
    /// Maximum number of times the explorer will enqueue the same block
    /// on a single path before abandoning it. Bounds loop exploration
    /// without computing a fixpoint; see section 4.4's non-goal on
    /// precise loop reasoning.
    pub max_block_visits: u32,
    /// When set, a `MemberAccess` on a value that merely *may* be null
    /// (rather than one the executor can prove is definitely null) is
    /// also reported. Off by default: this rule is deliberately narrow
    /// per section 4.1, and widening it this way produces one diagnostic
    /// per unchecked formal parameter.
    pub report_unknown_dereferences: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        ExecutorConfig { max_block_visits: 2, report_unknown_dereferences: false }
    }
}
