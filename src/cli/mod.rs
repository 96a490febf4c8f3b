// CLI surface: a small, clap-derive based interface over the executor.

pub mod cmds;

use clap::{Parser, Subcommand, ValueEnum};

/// nullwalk - path-sensitive null-dereference and tautological-condition checker
///
/// Traverses a single procedure's control-flow graph, tracking which
/// references are provably null or non-null along each feasible path,
/// and reports possible null dereferences and conditions that can only
/// ever evaluate one way.
#[derive(Parser, Debug, Clone)]
#[command(name = "nullwalk")]
#[command(author, version, about)]
pub struct Cli {
    /// Output format
    #[arg(global = true, long, value_enum, default_value_t = OutputFormat::Human)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Human,
    /// Compact JSON for programmatic consumption
    Json,
    /// Formatted JSON with indentation
    Pretty,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the symbolic executor over a CFG fixture and report findings
    Check(CheckArgs),

    /// Explain what the executor's rules would do, without reading a file
    Explain,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Path to a JSON file holding a single `CfgProgram`
    pub file: std::path::PathBuf,

    /// Abandon a path once a block has been visited this many times
    #[arg(long, env = "NULLWALK_MAX_BLOCK_VISITS", default_value_t = 2)]
    pub max_block_visits: u32,

    /// Also report dereferences of references that merely may be null,
    /// not only ones proven definitely null
    #[arg(long, env = "NULLWALK_REPORT_UNKNOWN_DEREFS", default_value_t = false)]
    pub report_unknown_derefs: bool,
}
