//! Defines the command-line arguments and subcommands for the lltrace CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "lltrace",
    version,
    about = "A predictive LL(1) parser that logs every leftmost derivation step."
)]
pub struct LltraceArgs {
    /// Enable debug logging of every expansion and match.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// YAML configuration file (header, first_line, output).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a token file and write its leftmost derivation.
    Parse {
        /// Token file, one token per line. Prompted for on stdin when omitted.
        file: Option<PathBuf>,
        /// Where to write the derivation. Overrides the configuration file.
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
        /// Derivation file format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the encoded grammar, one alternative per line.
    Grammar,
    /// Check the encoded grammar for LL(1) problems.
    CheckGrammar,
    /// Discover and run all YAML parse scenarios in a directory.
    Test {
        /// The path to the directory containing scenario files.
        #[arg(default_value = "tests/scenarios")]
        path: PathBuf,
        /// Only run scenarios whose name contains this substring.
        #[arg(long)]
        filter: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The plain derivation log.
    Text,
    /// A JSON report with the log, steps and outcome.
    Json,
}
