//! Expression evaluator: walks one `Expr` tree, updating the path state
//! and emitting dereference diagnostics as it goes, and produces the
//! `Refinement` the terminator needs to fork the explorer's state.

use crate::cfg::{local_display_name, Expr, LocalId};
use crate::se::config::ExecutorConfig;
use crate::se::diagnostics::DiagnosticSink;
use crate::se::state::ProgramState;
use crate::se::value::{Constraint, RefId, Refinement, SymbolicValue};
use std::collections::HashMap;

/// Monotonic source of fresh `RefId`s for one `execute` call. Ids are
/// only unique within a single run; nothing outside this crate ever
/// compares ids minted by different executions.
#[derive(Debug, Default)]
pub struct RefIdGen {
    next: RefId,
}

impl RefIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> RefId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Everything the evaluator needs besides the state it's folding over:
/// where to send findings, how to mint fresh references, the tuning
/// knobs, and the local-name table for naming a diagnostic. Bundled so
/// `eval_expr`'s signature doesn't grow every time it needs one more
/// piece of ambient context.
pub struct EvalCtx<'a> {
    pub sink: &'a mut dyn DiagnosticSink,
    pub refgen: &'a mut RefIdGen,
    pub config: &'a ExecutorConfig,
    pub locals: &'a HashMap<LocalId, String>,
}

/// Recurse through `MemberAccess`/`Ident` to find the deepest named
/// local, for naming a dereference diagnostic. Returns `None` for
/// receivers with no traceable identifier (e.g. a bare `Call`).
pub fn innermost_identifier(expr: &Expr) -> Option<LocalId> {
    match expr {
        Expr::Ident(id) => Some(*id),
        Expr::MemberAccess(inner) => innermost_identifier(inner),
        _ => None,
    }
}

/// Evaluate `expr` against `state`, reporting any dereference findings
/// to `ctx.sink`, and return its abstract value together with the
/// `Refinement` a branch terminator would use to fork on it.
///
/// `line` is the source line to attribute any diagnostic raised while
/// evaluating this expression to (the statement or terminator it came
/// from).
pub fn eval_expr(expr: &Expr, state: &ProgramState, ctx: &mut EvalCtx, line: u32) -> (SymbolicValue, Refinement) {
    match expr {
        Expr::NullLiteral => (SymbolicValue::DefinitelyNull, Refinement::trivial()),
        Expr::NonNullLiteral => (SymbolicValue::DefinitelyNonNull, Refinement::trivial()),
        Expr::BoolLiteral(true) => (SymbolicValue::BooleanTrue, Refinement::always_true()),
        Expr::BoolLiteral(false) => (SymbolicValue::BooleanFalse, Refinement::always_false()),

        Expr::Ident(id) => (state.lookup(*id), Refinement::trivial()),

        // An unmodeled call result is a fresh, unconstrained reference:
        // distinct from `Unknown` because it can still be refined by a
        // later null check (scenario 5's `getString()` case).
        Expr::Call => (SymbolicValue::SymbolicRef(ctx.refgen.fresh()), Refinement::trivial()),

        Expr::MemberAccess(receiver) => {
            let (value, _) = eval_expr(receiver, state, ctx, line);
            let fires = value.is_definitely_null(state.constraints())
                || (ctx.config.report_unknown_dereferences && value.may_be_null(state.constraints()));
            if fires {
                let name = innermost_identifier(receiver)
                    .map(|id| local_display_name(ctx.locals, id))
                    .unwrap_or_else(|| "expression".to_string());
                ctx.sink.report(line, format!("NullPointerException might be thrown as '{name}' is nullable here"));
            }
            // The member access itself yields an unconstrained reference:
            // this executor doesn't model field/return types precisely.
            (SymbolicValue::SymbolicRef(ctx.refgen.fresh()), Refinement::trivial())
        }

        Expr::Eq(lhs, rhs) => eval_equality(lhs, rhs, state, ctx, line, false),
        Expr::NotEq(lhs, rhs) => eval_equality(lhs, rhs, state, ctx, line, true),

        Expr::And(lhs, rhs) => {
            let (_, lhs_ref) = eval_expr(lhs, state, ctx, line);
            // Short-circuit: the right operand is only evaluated along
            // paths where the left operand was true, so it's evaluated
            // once per true-alt of the left refinement and its own
            // refinement is conjoined onto that alt.
            let mut true_branches = Vec::new();
            let mut false_branches = lhs_ref.false_branches.clone();
            for lhs_alt in &lhs_ref.true_branches {
                let Some(branch_state) = state.add_constraints(lhs_alt) else { continue };
                let (_, rhs_ref) = eval_expr(rhs, &branch_state, ctx, line);
                for rhs_true in &rhs_ref.true_branches {
                    true_branches.push(concat(lhs_alt, rhs_true));
                }
                for rhs_false in &rhs_ref.false_branches {
                    false_branches.push(concat(lhs_alt, rhs_false));
                }
            }
            let refinement = Refinement::capped(true_branches, false_branches);
            (refinement.collapse(), refinement)
        }

        Expr::Or(lhs, rhs) => {
            let (_, lhs_ref) = eval_expr(lhs, state, ctx, line);
            // Mirror of AND: the right operand only runs along paths
            // where the left operand was false.
            let mut true_branches = lhs_ref.true_branches.clone();
            let mut false_branches = Vec::new();
            for lhs_alt in &lhs_ref.false_branches {
                let Some(branch_state) = state.add_constraints(lhs_alt) else { continue };
                let (_, rhs_ref) = eval_expr(rhs, &branch_state, ctx, line);
                for rhs_true in &rhs_ref.true_branches {
                    true_branches.push(concat(lhs_alt, rhs_true));
                }
                for rhs_false in &rhs_ref.false_branches {
                    false_branches.push(concat(lhs_alt, rhs_false));
                }
            }
            let refinement = Refinement::capped(true_branches, false_branches);
            (refinement.collapse(), refinement)
        }

        Expr::Not(inner) => {
            let (_, inner_ref) = eval_expr(inner, state, ctx, line);
            let refinement = inner_ref.negate();
            (refinement.collapse(), refinement)
        }

        Expr::OtherBinary(lhs, rhs) => {
            eval_expr(lhs, state, ctx, line);
            eval_expr(rhs, state, ctx, line);
            (SymbolicValue::Unknown, Refinement::trivial())
        }
    }
}

fn concat(a: &[Constraint], b: &[Constraint]) -> Vec<Constraint> {
    let mut v = Vec::with_capacity(a.len() + b.len());
    v.extend_from_slice(a);
    v.extend_from_slice(b);
    v
}

fn eval_equality(
    lhs: &Expr,
    rhs: &Expr,
    state: &ProgramState,
    ctx: &mut EvalCtx,
    line: u32,
    negated: bool,
) -> (SymbolicValue, Refinement) {
    let (lhs_val, _) = eval_expr(lhs, state, ctx, line);
    let (rhs_val, _) = eval_expr(rhs, state, ctx, line);

    let refinement = match (lhs_val, rhs_val) {
        (SymbolicValue::SymbolicRef(r), SymbolicValue::DefinitelyNull)
        | (SymbolicValue::DefinitelyNull, SymbolicValue::SymbolicRef(r)) => {
            if negated {
                Refinement::not_eq_null(r)
            } else {
                Refinement::eq_null(r)
            }
        }
        (SymbolicValue::DefinitelyNull, SymbolicValue::DefinitelyNull) => {
            if negated {
                Refinement::always_false()
            } else {
                Refinement::always_true()
            }
        }
        (SymbolicValue::DefinitelyNonNull, SymbolicValue::DefinitelyNull)
        | (SymbolicValue::DefinitelyNull, SymbolicValue::DefinitelyNonNull) => {
            if negated {
                Refinement::always_true()
            } else {
                Refinement::always_false()
            }
        }
        _ => Refinement::trivial(),
    };
    (refinement.collapse(), refinement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::se::diagnostics::CollectingSink;

    fn harness() -> (ProgramState, CollectingSink, RefIdGen, ExecutorConfig, HashMap<LocalId, String>) {
        (ProgramState::empty(), CollectingSink::new(), RefIdGen::new(), ExecutorConfig::default(), HashMap::new())
    }

    #[test]
    fn dereferencing_a_null_literal_fires() {
        let (state, mut sink, mut refgen, config, locals) = harness();
        let mut ctx = EvalCtx { sink: &mut sink, refgen: &mut refgen, config: &config, locals: &locals };
        let expr = Expr::member_access(Expr::NullLiteral);
        eval_expr(&expr, &state, &mut ctx, 1);
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn dereferencing_an_unconstrained_call_result_is_silent() {
        let (state, mut sink, mut refgen, config, locals) = harness();
        let mut ctx = EvalCtx { sink: &mut sink, refgen: &mut refgen, config: &config, locals: &locals };
        let expr = Expr::member_access(Expr::Call);
        eval_expr(&expr, &state, &mut ctx, 1);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn dereferencing_a_ref_constrained_null_by_the_path_fires_with_its_name() {
        let (mut state, mut sink, mut refgen, config, mut locals) = harness();
        locals.insert(0, "a".to_string());
        state = state.bind(0, SymbolicValue::SymbolicRef(0));
        state = state.add_constraint(Constraint::null(0)).unwrap();
        let mut ctx = EvalCtx { sink: &mut sink, refgen: &mut refgen, config: &config, locals: &locals };
        let expr = Expr::member_access(Expr::Ident(0));
        eval_expr(&expr, &state, &mut ctx, 7);
        assert_eq!(sink.diagnostics()[0].line, 7);
        assert_eq!(sink.diagnostics()[0].message, "NullPointerException might be thrown as 'a' is nullable here");
    }

    #[test]
    fn eq_null_on_a_ref_produces_matching_refinement_arms() {
        let (mut state, mut sink, mut refgen, config, locals) = harness();
        state = state.bind(0, SymbolicValue::SymbolicRef(3));
        let mut ctx = EvalCtx { sink: &mut sink, refgen: &mut refgen, config: &config, locals: &locals };
        let expr = Expr::eq(Expr::Ident(0), Expr::NullLiteral);
        let (_, refinement) = eval_expr(&expr, &state, &mut ctx, 1);
        assert_eq!(refinement.true_branches, vec![vec![Constraint::null(3)]]);
        assert_eq!(refinement.false_branches, vec![vec![Constraint::not_null(3)]]);
    }

    #[test]
    fn and_short_circuits_the_right_operand() {
        let (mut state, mut sink, mut refgen, config, locals) = harness();
        state = state.bind(0, SymbolicValue::SymbolicRef(1));
        state = state.bind(1, SymbolicValue::SymbolicRef(2));
        let mut ctx = EvalCtx { sink: &mut sink, refgen: &mut refgen, config: &config, locals: &locals };
        let cond = Expr::and(
            Expr::not_eq(Expr::Ident(0), Expr::NullLiteral),
            Expr::not_eq(Expr::Ident(1), Expr::NullLiteral),
        );
        let (_, refinement) = eval_expr(&cond, &state, &mut ctx, 1);
        assert_eq!(refinement.true_branches, vec![vec![Constraint::not_null(1), Constraint::not_null(2)]]);
        assert_eq!(refinement.false_branches.len(), 2);
    }

    #[test]
    fn literal_true_is_always_true_refinement() {
        let (state, mut sink, mut refgen, config, locals) = harness();
        let mut ctx = EvalCtx { sink: &mut sink, refgen: &mut refgen, config: &config, locals: &locals };
        let (value, refinement) = eval_expr(&Expr::BoolLiteral(true), &state, &mut ctx, 1);
        assert_eq!(value, SymbolicValue::BooleanTrue);
        assert!(refinement.false_branches.is_empty());
    }

    #[test]
    fn not_negates_the_inner_refinement() {
        let (mut state, mut sink, mut refgen, config, locals) = harness();
        state = state.bind(0, SymbolicValue::SymbolicRef(5));
        let mut ctx = EvalCtx { sink: &mut sink, refgen: &mut refgen, config: &config, locals: &locals };
        let cond = Expr::not(Expr::eq(Expr::Ident(0), Expr::NullLiteral));
        let (_, refinement) = eval_expr(&cond, &state, &mut ctx, 1);
        assert_eq!(refinement.true_branches, vec![vec![Constraint::not_null(5)]]);
        assert_eq!(refinement.false_branches, vec![vec![Constraint::null(5)]]);
    }
}
