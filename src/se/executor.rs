//! Public entry point: run the path explorer over one procedure.

use crate::cfg::{build_cfg, find_entry, CfgProgram};
use crate::se::config::ExecutorConfig;
use crate::se::diagnostics::DiagnosticSink;
use crate::se::eval::{EvalCtx, RefIdGen};
use crate::se::explorer::explore;
use crate::se::state::ProgramState;
use crate::se::value::SymbolicValue;
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Build `program`'s CFG and explore every feasible path through it,
/// reporting findings to `sink`.
///
/// Formal parameters are seeded as fresh, unconstrained symbolic
/// references: this crate has no caller context, so a parameter is
/// "possibly null" only in the sense that it carries no information
/// either way until a branch refines it.
pub fn execute(program: &CfgProgram, sink: &mut dyn DiagnosticSink, config: &ExecutorConfig) -> Result<()> {
    let cfg = build_cfg(program).with_context(|| format!("building CFG for `{}`", program.function_name))?;
    let entry = find_entry(&cfg)
        .with_context(|| format!("`{}` has an empty CFG with no entry block", program.function_name))?;

    let mut refgen = RefIdGen::new();
    let mut state = ProgramState::empty();
    for param in &program.parameters {
        state = state.bind(*param, SymbolicValue::SymbolicRef(refgen.fresh()));
    }

    info!(function = %program.function_name, blocks = program.blocks.len(), "starting path exploration");
    let mut ctx = EvalCtx { sink, refgen: &mut refgen, config, locals: &program.locals };
    explore(&cfg, entry, state, &mut ctx);
    debug!(function = %program.function_name, "path exploration complete");
    Ok(())
}
