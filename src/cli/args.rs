//! Defines the command-line arguments and subcommands for the aidl CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "aidl",
    version,
    about = "Parses aidl interface definitions and reports what it finds."
)]
pub struct AidlArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the document tree for a file.
    Ast {
        /// The path to the aidl file to parse.
        #[arg(required = true)]
        file: PathBuf,
        /// Package used when the file has no `package` statement.
        #[arg(long)]
        package: Option<String>,
        /// Print the tree as JSON.
        #[arg(long)]
        json: bool,
        /// Number the methods of every interface before printing.
        #[arg(long)]
        assign_ids: bool,
    },
    /// Parse files, number their methods and report every problem found.
    Check {
        /// The aidl files to check; each is parsed independently.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Package used when a file has no `package` statement.
        #[arg(long)]
        package: Option<String>,
    },
    /// List the imports of a file with their classification.
    Imports {
        /// The path to the aidl file to inspect.
        #[arg(required = true)]
        file: PathBuf,
        /// Print the imports as JSON.
        #[arg(long)]
        json: bool,
    },
}
