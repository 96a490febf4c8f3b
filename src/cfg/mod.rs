// CFG data structures for a single procedure's control-flow graph.
//
// The source parser and the CFG builder that lowers a method body into
// these structures are out of scope (they're the external collaborators
// this crate depends on only through this module's types). What lives
// here is the contract: basic blocks, three-address-ish instructions,
// and the terminators that drive the path explorer.

pub mod analysis;
pub mod edge;

pub use analysis::{find_entry, find_exits};
pub use edge::EdgeType;

use anyhow::{bail, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Control flow graph: nodes are basic blocks, edges are classified by
/// the branch they came from.
pub type Cfg = DiGraph<BasicBlock, EdgeType>;

/// Block identifier, stable within one procedure.
pub type BlockId = usize;

/// Stable identity of a local variable within one procedure.
///
/// Per the design notes on identifier stability: shadowing by inner
/// scopes must already be resolved upstream, so two `LocalId`s are equal
/// iff they denote the same variable for its entire lifetime in the
/// method.
pub type LocalId = u32;

/// A basic block: a straight-line sequence of instructions ending in a
/// terminator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub kind: BlockKind,
    pub statements: Vec<Instruction>,
    pub terminator: Terminator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Entry,
    Normal,
    Exit,
}

/// One statement in a block, carrying the source line it came from so
/// diagnostics can be keyed correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub line: u32,
    pub kind: InstructionKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InstructionKind {
    /// `x = E`
    Assign { dest: LocalId, expr: Expr },
    /// An expression evaluated purely for its side effect (a dereference
    /// check point), e.g. `b.toString();` as a standalone statement.
    Eval { expr: Expr },
}

/// An expression tree. Kept as a tree rather than flattened
/// three-address code so that short-circuit AND/OR compose naturally:
/// flattening them to a scalar before the terminator is exactly the
/// mistake the design notes warn against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    NullLiteral,
    /// String / char / numeric literal.
    NonNullLiteral,
    BoolLiteral(bool),
    Ident(LocalId),
    /// A call with no modeled receiver (e.g. a static helper or a
    /// constructor): yields a fresh, unconstrained reference.
    Call,
    /// `e.m(...)` or `e.f` — the receiver is checked for nullability at
    /// this point.
    MemberAccess(Box<Expr>),
    Eq(Box<Expr>, Box<Expr>),
    NotEq(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    /// Any other binary operator this executor doesn't model precisely
    /// (arithmetic, comparisons other than (in)equality, ...).
    OtherBinary(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn member_access(receiver: Expr) -> Self {
        Expr::MemberAccess(Box::new(receiver))
    }

    pub fn eq(lhs: Expr, rhs: Expr) -> Self {
        Expr::Eq(Box::new(lhs), Box::new(rhs))
    }

    pub fn not_eq(lhs: Expr, rhs: Expr) -> Self {
        Expr::NotEq(Box::new(lhs), Box::new(rhs))
    }

    pub fn and(lhs: Expr, rhs: Expr) -> Self {
        Expr::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Expr, rhs: Expr) -> Self {
        Expr::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn not(inner: Expr) -> Self {
        Expr::Not(Box::new(inner))
    }
}

/// Terminator instruction. Successor block ids are carried directly
/// (true-successor first for a `Branch`, per the external CFG contract),
/// so the path explorer never needs to consult graph edges to know where
/// to go next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminator {
    Jump(BlockId),
    /// `line` is the source line of the condition-yielding instruction
    /// itself, not of the block's last statement — a condition-only
    /// branch block has no statements to borrow a line from.
    Branch { condition: Expr, line: u32, then_block: BlockId, else_block: BlockId },
    Return,
    Exit,
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        // Structural equality is never needed by the executor; only
        // Terminator's derive(PartialEq) (used by tests) requires it.
        format!("{self:?}") == format!("{other:?}")
    }
}
impl Eq for Expr {}

/// A full procedure: its CFG blocks, the display name of each local, and
/// which locals are formal parameters (seeded as fresh, unconstrained
/// references at entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfgProgram {
    pub function_name: String,
    pub blocks: Vec<BasicBlock>,
    pub locals: HashMap<LocalId, String>,
    pub parameters: Vec<LocalId>,
}

impl CfgProgram {
    pub fn local_name(&self, id: LocalId) -> String {
        local_display_name(&self.locals, id)
    }
}

/// Shared fallback naming rule: a local with no display name recorded
/// falls back to `local#{id}`. Used both by `CfgProgram::local_name` and
/// by the evaluator when it needs to name a local in a diagnostic.
pub fn local_display_name(locals: &HashMap<LocalId, String>, id: LocalId) -> String {
    locals.get(&id).cloned().unwrap_or_else(|| format!("local#{id}"))
}

/// Build the petgraph CFG from a program's block list.
///
/// Blocks are assumed to be index-aligned with their `BlockId` (block at
/// position `i` has `id == i`) — the same sequential-ordering assumption
/// a terminator-driven edge construction naturally relies on. Malformed
/// input (a terminator pointing at a block id that doesn't exist, or a
/// block list out of order) is a programmer error upstream and fails
/// fatally per the error-handling design, rather than silently dropping
/// the edge.
pub fn build_cfg(program: &CfgProgram) -> Result<Cfg> {
    let mut graph: Cfg = DiGraph::new();

    for (idx, block) in program.blocks.iter().enumerate() {
        if block.id != idx {
            bail!(
                "malformed CFG: block at position {idx} has id {}, blocks must be index-aligned",
                block.id
            );
        }
        graph.add_node(block.clone());
    }

    for (idx, block) in program.blocks.iter().enumerate() {
        for (target, edge) in edge::classify_terminator(&block.terminator) {
            if target >= program.blocks.len() {
                bail!("malformed CFG: block {idx} terminator targets missing block {target}");
            }
            graph.add_edge(NodeIndex::new(idx), NodeIndex::new(target), edge);
        }
    }

    Ok(graph)
}
