//! The worklist-driven path explorer: walks the CFG one path-state at a
//! time, folding instructions through the evaluator and forking at
//! branches.

use crate::cfg::{BlockId, Cfg, InstructionKind, Terminator};
use crate::se::eval::{eval_expr, EvalCtx};
use crate::se::state::ProgramState;
use crate::se::value::SymbolicValue;
use petgraph::graph::NodeIndex;

/// Drive the explorer to completion over `cfg`, starting from `entry`
/// with `initial_state`. A LIFO worklist (depth-first) keeps the
/// exploration simple and matches how the teacher's own traversal
/// utilities walk a CFG.
pub fn explore(cfg: &Cfg, entry: NodeIndex, initial_state: ProgramState, ctx: &mut EvalCtx) {
    let mut worklist: Vec<(NodeIndex, ProgramState)> = vec![(entry, initial_state)];

    while let Some((node, state)) = worklist.pop() {
        let Some(block) = cfg.node_weight(node) else { continue };
        let block_id: BlockId = block.id;

        if state.visits(block_id) >= ctx.config.max_block_visits {
            continue;
        }
        let mut state = state.record_visit(block_id);

        for stmt in &block.statements {
            match &stmt.kind {
                InstructionKind::Assign { dest, expr } => {
                    let (value, _) = eval_expr(expr, &state, ctx, stmt.line);
                    state = state.bind(*dest, value);
                }
                InstructionKind::Eval { expr } => {
                    eval_expr(expr, &state, ctx, stmt.line);
                }
            }
        }

        match &block.terminator {
            Terminator::Jump(target) => {
                if let Some(idx) = node_for_block(cfg, *target) {
                    worklist.push((idx, state));
                }
            }
            Terminator::Return | Terminator::Exit => {}
            Terminator::Branch { condition, line, then_block, else_block } => {
                let line = *line;
                let (value, refinement) = eval_expr(condition, &state, ctx, line);

                let mut feasible_true: Vec<ProgramState> = Vec::new();
                for alt in &refinement.true_branches {
                    if let Some(s) = state.add_constraints(alt) {
                        feasible_true.push(s);
                    }
                }
                let mut feasible_false: Vec<ProgramState> = Vec::new();
                for alt in &refinement.false_branches {
                    if let Some(s) = state.add_constraints(alt) {
                        feasible_false.push(s);
                    }
                }

                // A condition that collapses to a concrete boolean is
                // tautological on that arm outright. The refinement
                // alone can't see this for a bare `Ident` load of a
                // bound boolean constant (`Ident` always yields a
                // trivial refinement regardless of the looked-up value),
                // so the evaluated `value` overrides whichever arm it
                // contradicts even when the refinement thought both were
                // reachable.
                let true_live = !matches!(value, SymbolicValue::BooleanFalse) && !feasible_true.is_empty();
                let false_live = !matches!(value, SymbolicValue::BooleanTrue) && !feasible_false.is_empty();

                match (true_live, false_live) {
                    (true, false) => {
                        ctx.sink.report(
                            line,
                            "Change this condition so that it does not always evaluate to \"true\"".to_string(),
                        );
                        if let Some(idx) = node_for_block(cfg, *then_block) {
                            for s in feasible_true {
                                worklist.push((idx, s));
                            }
                        }
                    }
                    (false, true) => {
                        ctx.sink.report(
                            line,
                            "Change this condition so that it does not always evaluate to \"false\"".to_string(),
                        );
                        if let Some(idx) = node_for_block(cfg, *else_block) {
                            for s in feasible_false {
                                worklist.push((idx, s));
                            }
                        }
                    }
                    (true, true) => {
                        if let Some(idx) = node_for_block(cfg, *then_block) {
                            for s in feasible_true {
                                worklist.push((idx, s));
                            }
                        }
                        if let Some(idx) = node_for_block(cfg, *else_block) {
                            for s in feasible_false {
                                worklist.push((idx, s));
                            }
                        }
                    }
                    (false, false) => {
                        // Both arms contradict the accumulated path
                        // constraints: this path is dead, not a
                        // tautology to report, since nothing reaches
                        // this terminator feasibly in the first place.
                    }
                }
            }
        }
    }
}

fn node_for_block(cfg: &Cfg, block_id: BlockId) -> Option<NodeIndex> {
    cfg.node_indices().find(|&idx| cfg[idx].id == block_id)
}
