//! The aidl Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands. Each file is
//! parsed by its own [`ParseState`]; nothing is shared between files.

use std::path::Path;
use std::process;

use clap::Parser;

use crate::cli::args::{AidlArgs, Command};
use crate::errors::AidlError;
use crate::logging;
use crate::parse_state::ParseState;

pub mod args;
pub mod diagnostics;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    logging::init_tracing();
    let args = AidlArgs::parse();

    let result = match args.command {
        Command::Ast {
            file,
            package,
            json,
            assign_ids,
        } => handle_ast(&file, package.as_deref(), json, assign_ids),
        Command::Check { files, package } => Ok(handle_check(&files, package.as_deref())),
        Command::Imports { file, json } => handle_imports(&file, json),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            process::exit(1);
        }
    }
}

fn parse_file(path: &Path, package: Option<&str>) -> Result<ParseState, AidlError> {
    let mut state = ParseState::new(path);
    if let Some(package) = package {
        state = state.with_package(package);
    }
    state.open_file_from_disk()?;
    state.run_parser()?;
    diagnostics::print_diagnostics_to_stderr(state.diagnostics(), state.source());
    Ok(state)
}

/// Handles the `ast` subcommand. A failed parse prints diagnostics only.
fn handle_ast(
    path: &Path,
    package: Option<&str>,
    json: bool,
    assign_ids: bool,
) -> Result<bool, AidlError> {
    let mut state = parse_file(path, package)?;
    if !state.found_no_errors() {
        return Ok(false);
    }
    if assign_ids {
        state.assign_method_ids()?;
    }

    let file = state.file_name()?;
    let package = state.package()?;
    let imports = state.imports()?;
    let items = state.document()?;
    if json {
        match output::document_to_json(file, package, imports, items) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("cannot serialize document: {}", e);
                return Ok(false);
            }
        }
    } else {
        output::print_outline(&output::render_outline(package, imports, items));
    }
    Ok(true)
}

/// Handles the `check` subcommand. Every file is checked even after a
/// failure; the result is false if any file failed.
fn handle_check(paths: &[std::path::PathBuf], package: Option<&str>) -> bool {
    let mut failed = 0;
    for path in paths {
        let ok = match parse_file(path, package) {
            Ok(mut state) if state.found_no_errors() => match state.assign_method_ids() {
                Ok(()) => true,
                Err(e) => {
                    eprintln!("{:?}", miette::Report::new(e));
                    false
                }
            },
            Ok(_) => false,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(e));
                false
            }
        };
        if !ok {
            failed += 1;
        }
    }
    eprintln!("{} file(s) checked, {} failed", paths.len(), failed);
    failed == 0
}

/// Handles the `imports` subcommand.
fn handle_imports(path: &Path, json: bool) -> Result<bool, AidlError> {
    let state = parse_file(path, None)?;
    let imports = state.imports()?;
    if json {
        match output::imports_to_json(imports) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("cannot serialize imports: {}", e);
                return Ok(false);
            }
        }
    } else {
        for import in imports {
            println!("{}", output::render_import(import));
        }
    }
    Ok(state.found_no_errors())
}
