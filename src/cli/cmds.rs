// Command implementations: load a CFG fixture, run the executor, render
// its findings in whichever format the caller asked for.

use crate::cfg::CfgProgram;
use crate::cli::{Cli, CheckArgs, OutputFormat};
use crate::output::{self, JsonError, JsonResponse};
use crate::platform::{EXIT_FILE_NOT_FOUND, EXIT_VALIDATION};
use crate::se::{execute, CollectingSink, Diagnostic, ExecutorConfig};
use anyhow::Result;
use std::fs;

pub fn check(args: &CheckArgs, cli: &Cli) -> Result<()> {
    let raw = match fs::read_to_string(&args.file) {
        Ok(raw) => raw,
        Err(_) => {
            emit_error(cli.output, JsonError::file_not_found(&args.file.display().to_string()));
            std::process::exit(EXIT_FILE_NOT_FOUND);
        }
    };

    let program: CfgProgram = match serde_json::from_str(&raw) {
        Ok(p) => p,
        Err(e) => {
            emit_error(cli.output, JsonError::invalid_input(&e.to_string()));
            std::process::exit(EXIT_VALIDATION);
        }
    };

    let config = ExecutorConfig {
        max_block_visits: args.max_block_visits,
        report_unknown_dereferences: args.report_unknown_derefs,
    };

    let mut sink = CollectingSink::new();
    if let Err(e) = execute(&program, &mut sink, &config) {
        emit_error(cli.output, JsonError::malformed_cfg(&e.to_string()));
        std::process::exit(EXIT_VALIDATION);
    }

    let diagnostics = sink.into_diagnostics();
    render_diagnostics(cli.output, &program.function_name, &diagnostics);
    Ok(())
}

pub fn explain(_cli: &Cli) -> Result<()> {
    output::header("nullwalk's two diagnostic rules");
    println!("null dereference:");
    println!("  fires on `e.m(...)` or `e.f` only when `e` is provably null —");
    println!("  DefinitelyNull, or a reference constrained null by every");
    println!("  feasible path reaching that point. An unconstrained or");
    println!("  possibly-null reference is not enough on its own.");
    println!();
    println!("tautological condition:");
    println!("  fires on a branch whose condition can only ever take one arm,");
    println!("  whether that's because the condition folds to a literal or");
    println!("  because the accumulated path constraints make the other arm");
    println!("  infeasible.");
    Ok(())
}

fn render_diagnostics(format: OutputFormat, function_name: &str, diagnostics: &[Diagnostic]) {
    match format {
        OutputFormat::Human => {
            if diagnostics.is_empty() {
                output::info(&format!("no findings in `{function_name}`"));
                return;
            }
            output::header(&format!("findings in `{function_name}`"));
            for d in diagnostics {
                output::diagnostic(d.line, &d.message);
            }
        }
        OutputFormat::Json => {
            let response = JsonResponse::new(diagnostics);
            println!("{}", response.to_json());
        }
        OutputFormat::Pretty => {
            let response = JsonResponse::new(diagnostics);
            println!("{}", response.to_pretty_json());
        }
    }
}

fn emit_error(format: OutputFormat, err: JsonError) {
    match format {
        OutputFormat::Human => output::error(&err.message),
        OutputFormat::Json => println!("{}", serde_json::to_string(&err).unwrap_or_default()),
        OutputFormat::Pretty => println!("{}", serde_json::to_string_pretty(&err).unwrap_or_default()),
    }
}
