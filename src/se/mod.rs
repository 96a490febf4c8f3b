//! The symbolic executor: value lattice, path state, instruction
//! evaluator, worklist explorer, diagnostic sink, and the `execute`
//! entry point that ties them together.

pub mod config;
pub mod diagnostics;
pub mod eval;
pub mod executor;
pub mod explorer;
pub mod state;
pub mod value;

pub use config::ExecutorConfig;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use executor::execute;
pub use state::ProgramState;
pub use value::{Constraint, ConstraintSet, Polarity, RefId, Refinement, SymbolicValue};
