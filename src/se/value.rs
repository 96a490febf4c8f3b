//! The symbolic value lattice and the path constraints that refine it.
//!
//! A flat lattice over nullability plus boolean/literal shape. Join is
//! the usual "fall back to the more general" rule: any two distinct
//! concrete values join to `Unknown`, unless one side is a
//! `SymbolicRef` whose constraints under the target state resolve the
//! other.

use serde::Serialize;
use std::collections::BTreeSet;

/// Opaque identity for a reference value whose nullability is governed
/// by path constraints rather than known outright. Minted from a
/// monotonically increasing counter; ids need not be globally unique
/// across independent `execute` calls (see the concurrency model).
pub type RefId = u32;

/// Finite tagged set of abstract values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolicValue {
    /// No information; neither provably null nor non-null.
    Unknown,
    DefinitelyNull,
    DefinitelyNonNull,
    BooleanTrue,
    BooleanFalse,
    SymbolicRef(RefId),
}

impl SymbolicValue {
    /// `true` iff this value is `DefinitelyNull`, or a `SymbolicRef`
    /// constrained to null under `constraints`.
    pub fn is_definitely_null(&self, constraints: &ConstraintSet) -> bool {
        match self {
            SymbolicValue::DefinitelyNull => true,
            SymbolicValue::SymbolicRef(id) => constraints.contains(&Constraint::null(*id)),
            _ => false,
        }
    }

    /// `true` iff this value is `DefinitelyNonNull`, or a `SymbolicRef`
    /// constrained non-null under `constraints`.
    pub fn is_definitely_non_null(&self, constraints: &ConstraintSet) -> bool {
        match self {
            SymbolicValue::DefinitelyNonNull => true,
            SymbolicValue::SymbolicRef(id) => constraints.contains(&Constraint::not_null(*id)),
            _ => false,
        }
    }

    /// `!is_definitely_non_null`. This is the lattice-level predicate;
    /// the dereference check uses the narrower `is_definitely_null` rule
    /// from section 4.1, not this one, to avoid flagging every
    /// unconstrained reference.
    pub fn may_be_null(&self, constraints: &ConstraintSet) -> bool {
        !self.is_definitely_non_null(constraints)
    }

    /// Join two values to the more general one. Two equal values join to
    /// themselves; any other combination is `Unknown`.
    pub fn join(self, other: SymbolicValue) -> SymbolicValue {
        if self == other {
            self
        } else {
            SymbolicValue::Unknown
        }
    }
}

/// Polarity of an atomic nullability fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Polarity {
    Null,
    NotNull,
}

/// An atomic fact of shape `SymbolicRef(id) IS (NOT) NULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Constraint {
    pub r: RefId,
    pub polarity: Polarity,
}

impl Constraint {
    pub fn null(r: RefId) -> Self {
        Constraint { r, polarity: Polarity::Null }
    }

    pub fn not_null(r: RefId) -> Self {
        Constraint { r, polarity: Polarity::NotNull }
    }

    /// The constraint that would make this one infeasible if both were
    /// present in the same set.
    pub fn negation(self) -> Self {
        Constraint {
            r: self.r,
            polarity: match self.polarity {
                Polarity::Null => Polarity::NotNull,
                Polarity::NotNull => Polarity::Null,
            },
        }
    }
}

/// Ordered so two independently-built but logically-equal constraint
/// sets compare and hash identically.
pub type ConstraintSet = BTreeSet<Constraint>;

/// One alternative conjunction of constraints sufficient to reach an
/// arm of a condition. A `Refinement` carries the true arm and the
/// false arm each as a *disjunction* of conjunctions (DNF), because a
/// compound boolean like `to == null && from != null` can reach its
/// false arm through more than one mutually exclusive scenario
/// (`to != null`, or `to == null && from == null`).
#[derive(Debug, Clone, Default)]
pub struct Refinement {
    pub true_branches: Vec<Vec<Constraint>>,
    pub false_branches: Vec<Vec<Constraint>>,
}

/// Upper bound on alternative conjunctions tracked per arm. Realistic
/// chains produce one alternative per conjunct; this only guards
/// against pathological OR-of-ORs chains blowing up the fork count.
pub const MAX_REFINEMENT_ALTS: usize = 16;

impl Refinement {
    /// No information either way: both arms are reachable with no
    /// extra constraint. Used for non-boolean expressions and for
    /// `Unknown` boolean values.
    pub fn trivial() -> Self {
        Refinement { true_branches: vec![vec![]], false_branches: vec![vec![]] }
    }

    /// Always true: the false arm is unreachable.
    pub fn always_true() -> Self {
        Refinement { true_branches: vec![vec![]], false_branches: vec![] }
    }

    /// Always false: the true arm is unreachable.
    pub fn always_false() -> Self {
        Refinement { true_branches: vec![], false_branches: vec![vec![]] }
    }

    /// `ref IS NULL` on the true arm, `ref IS NOT NULL` on the false arm.
    pub fn eq_null(r: RefId) -> Self {
        Refinement {
            true_branches: vec![vec![Constraint::null(r)]],
            false_branches: vec![vec![Constraint::not_null(r)]],
        }
    }

    /// `ref IS NOT NULL` on the true arm, `ref IS NULL` on the false arm
    /// (the `!=` mirror of `eq_null`).
    pub fn not_eq_null(r: RefId) -> Self {
        Refinement {
            true_branches: vec![vec![Constraint::not_null(r)]],
            false_branches: vec![vec![Constraint::null(r)]],
        }
    }

    /// Swap the two arms (logical NOT of the underlying condition).
    pub fn negate(self) -> Self {
        Refinement { true_branches: self.false_branches, false_branches: self.true_branches }
    }

    fn cap(mut v: Vec<Vec<Constraint>>) -> Vec<Vec<Constraint>> {
        v.truncate(MAX_REFINEMENT_ALTS);
        v
    }

    pub fn capped(true_branches: Vec<Vec<Constraint>>, false_branches: Vec<Vec<Constraint>>) -> Self {
        Refinement { true_branches: Self::cap(true_branches), false_branches: Self::cap(false_branches) }
    }

    /// Collapse to a concrete `SymbolicValue`: always-true/always-false
    /// collapse to the matching boolean, anything with both arms
    /// reachable collapses to `Unknown` (the refinement structure
    /// itself, not the stored value, is what `eval_cond` uses at a
    /// terminator).
    pub fn collapse(&self) -> SymbolicValue {
        match (self.true_branches.is_empty(), self.false_branches.is_empty()) {
            (false, true) => SymbolicValue::BooleanTrue,
            (true, false) => SymbolicValue::BooleanFalse,
            _ => SymbolicValue::Unknown,
        }
    }
}
