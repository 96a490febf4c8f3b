//! Edge type classification for CFG edges

use serde::{Deserialize, Serialize};

/// Type of control flow edge between basic blocks.
///
/// Scoped to what a single, exception-free, call-opaque procedure CFG
/// needs: conditional branches and straight-line fallthrough. The
/// richer edge set a wider code-intelligence tool would carry (loop
/// back-edges, unwind, calls) belongs to inter-procedural and
/// loop-fixpoint analysis this crate doesn't do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    /// Conditional branch taken (true)
    TrueBranch,
    /// Conditional branch not taken (false)
    FalseBranch,
    /// Sequential fallthrough
    Fallthrough,
}

impl EdgeType {
    /// Color for DOT visualization
    pub fn dot_color(&self) -> &'static str {
        match self {
            EdgeType::TrueBranch => "green",
            EdgeType::FalseBranch => "red",
            EdgeType::Fallthrough => "black",
        }
    }

    /// Label for DOT visualization
    pub fn dot_label(&self) -> &'static str {
        match self {
            EdgeType::TrueBranch => "T",
            EdgeType::FalseBranch => "F",
            EdgeType::Fallthrough => "",
        }
    }
}

/// Classify edges implied by a block's terminator.
///
/// Mirrors the terminator-driven edge construction a CFG builder would
/// do: the explorer itself never consults these, it reads successor
/// block ids straight off `Terminator`. This exists for the `cfg`
/// CLI subcommand, which wants an edge-labelled graph to export.
pub fn classify_terminator(terminator: &crate::cfg::Terminator) -> Vec<(usize, EdgeType)> {
    use crate::cfg::Terminator::*;

    match terminator {
        Jump(target) => vec![(*target, EdgeType::Fallthrough)],
        Branch { then_block, else_block, .. } => {
            vec![(*then_block, EdgeType::TrueBranch), (*else_block, EdgeType::FalseBranch)]
        }
        Return | Exit => vec![],
    }
}
