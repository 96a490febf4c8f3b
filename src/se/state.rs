//! ProgramState: the per-path snapshot the explorer carries around.

use crate::cfg::{BlockId, LocalId};
use crate::se::value::{Constraint, ConstraintSet, SymbolicValue};
use std::collections::HashMap;
use std::rc::Rc;

/// Immutable-by-convention mapping from local variables to symbolic
/// values, plus accumulated path constraints and per-block visit
/// counts. Cheaply forked at branch points: the three maps are
/// reference-counted, so `fork` is a handful of `Rc::clone`s, and only
/// the first mutation after a fork pays to copy the underlying map
/// (`Rc::make_mut`).
#[derive(Debug, Clone)]
pub struct ProgramState {
    bindings: Rc<HashMap<LocalId, SymbolicValue>>,
    constraints: Rc<ConstraintSet>,
    visit_counts: Rc<HashMap<BlockId, u32>>,
}

impl ProgramState {
    /// A fresh state with no bindings, no constraints, and no visits
    /// recorded — the state `execute` builds at a procedure's entry
    /// block before seeding formal parameters.
    pub fn empty() -> Self {
        ProgramState {
            bindings: Rc::new(HashMap::new()),
            constraints: Rc::new(ConstraintSet::new()),
            visit_counts: Rc::new(HashMap::new()),
        }
    }

    /// A logically independent copy. Mutating the fork never affects
    /// `self`, and vice versa.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// Current value of `id`; unbound locals resolve to `Unknown`.
    pub fn lookup(&self, id: LocalId) -> SymbolicValue {
        self.bindings.get(&id).copied().unwrap_or(SymbolicValue::Unknown)
    }

    /// A new state with `id` rebound to `value`.
    pub fn bind(&self, id: LocalId, value: SymbolicValue) -> Self {
        let mut bindings = Rc::clone(&self.bindings);
        Rc::make_mut(&mut bindings).insert(id, value);
        ProgramState { bindings, constraints: Rc::clone(&self.constraints), visit_counts: Rc::clone(&self.visit_counts) }
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Add one constraint, returning `None` if it contradicts the
    /// existing set (the state is infeasible and must be discarded).
    pub fn add_constraint(&self, constraint: Constraint) -> Option<Self> {
        if self.constraints.contains(&constraint.negation()) {
            return None;
        }
        if self.constraints.contains(&constraint) {
            return Some(self.clone());
        }
        let mut constraints = Rc::clone(&self.constraints);
        Rc::make_mut(&mut constraints).insert(constraint);
        Some(ProgramState { bindings: Rc::clone(&self.bindings), constraints, visit_counts: Rc::clone(&self.visit_counts) })
    }

    /// Add a whole conjunction of constraints, short-circuiting to
    /// `None` as soon as one contradicts the accumulated set.
    pub fn add_constraints(&self, constraints: &[Constraint]) -> Option<Self> {
        let mut state = self.clone();
        for c in constraints {
            state = state.add_constraint(*c)?;
        }
        Some(state)
    }

    /// Visits recorded for `block` so far on this path.
    pub fn visits(&self, block: BlockId) -> u32 {
        self.visit_counts.get(&block).copied().unwrap_or(0)
    }

    /// A new state with `block`'s visit count incremented. Visit
    /// counts live inside `ProgramState`, not a side table keyed only by
    /// block, so that two independent paths meeting at the same block
    /// don't prematurely saturate each other.
    pub fn record_visit(&self, block: BlockId) -> Self {
        let mut visit_counts = Rc::clone(&self.visit_counts);
        let counts = Rc::make_mut(&mut visit_counts);
        *counts.entry(block).or_insert(0) += 1;
        ProgramState { bindings: Rc::clone(&self.bindings), constraints: Rc::clone(&self.constraints), visit_counts }
    }
}

impl Default for ProgramState {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::se::value::Constraint;

    #[test]
    fn lookup_of_unbound_local_is_unknown() {
        let s = ProgramState::empty();
        assert_eq!(s.lookup(42), SymbolicValue::Unknown);
    }

    #[test]
    fn bind_does_not_mutate_the_original() {
        let s0 = ProgramState::empty();
        let s1 = s0.bind(1, SymbolicValue::DefinitelyNull);
        assert_eq!(s0.lookup(1), SymbolicValue::Unknown);
        assert_eq!(s1.lookup(1), SymbolicValue::DefinitelyNull);
    }

    #[test]
    fn fork_is_independent() {
        let s0 = ProgramState::empty().bind(1, SymbolicValue::DefinitelyNonNull);
        let fork = s0.fork();
        let fork_rebound = fork.bind(1, SymbolicValue::DefinitelyNull);
        assert_eq!(s0.lookup(1), SymbolicValue::DefinitelyNonNull);
        assert_eq!(fork.lookup(1), SymbolicValue::DefinitelyNonNull);
        assert_eq!(fork_rebound.lookup(1), SymbolicValue::DefinitelyNull);
    }

    #[test]
    fn contradictory_constraint_is_infeasible() {
        let s = ProgramState::empty().add_constraint(Constraint::null(1)).unwrap();
        assert!(s.add_constraint(Constraint::not_null(1)).is_none());
    }

    #[test]
    fn redundant_constraint_is_a_no_op() {
        let s = ProgramState::empty().add_constraint(Constraint::null(1)).unwrap();
        let s2 = s.add_constraint(Constraint::null(1)).unwrap();
        assert_eq!(s2.constraints().len(), 1);
    }

    #[test]
    fn visit_counts_increment_and_default_to_zero() {
        let s = ProgramState::empty();
        assert_eq!(s.visits(3), 0);
        let s1 = s.record_visit(3);
        assert_eq!(s1.visits(3), 1);
        assert_eq!(s.visits(3), 0);
        let s2 = s1.record_visit(3);
        assert_eq!(s2.visits(3), 2);
    }

    #[test]
    fn visit_counts_are_per_block() {
        let s = ProgramState::empty().record_visit(1).record_visit(1).record_visit(2);
        assert_eq!(s.visits(1), 2);
        assert_eq!(s.visits(2), 1);
    }
}
