//! The lltrace Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser as _;
use log::LevelFilter;

use crate::cli::args::{Command, LltraceArgs, OutputFormat};
use crate::cli::output::{print_failure, print_grammar, print_success, print_validation, StdoutSink};
use crate::config::ParserConfig;
use crate::errors::{print_error, TraceError};
use crate::syntax::{derive, FileSink, LogSink, Parser, TokenStream, GRAMMAR};
use crate::test_harness::{run_all_tests, TestConfig};
use crate::validation::validate_builtin_grammar;

pub mod args;
pub mod output;

/// Output path that streams the derivation to stdout instead of a file.
const STDOUT_PATH: &str = "-";

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = LltraceArgs::parse();
    init_logging(args.verbose);

    let config = ParserConfig::load_or_default(args.config.as_deref()).unwrap_or_else(|e| {
        print_error(e);
        process::exit(1);
    });

    match args.command {
        Command::Parse {
            file,
            output,
            format,
        } => {
            let output = output.unwrap_or_else(|| config.output.clone());
            match handle_parse(file, &output, format, &config) {
                Ok(true) => print_success(&format!("Derivation written to {}", output.display())),
                Ok(false) => {
                    print_failure(&format!(
                        "Parsing failed. Check {} for details.",
                        output.display()
                    ));
                    process::exit(1);
                }
                Err(e) => {
                    print_error(e);
                    process::exit(1);
                }
            }
        }

        Command::Grammar => print_grammar(&GRAMMAR),

        Command::CheckGrammar => {
            let result = validate_builtin_grammar();
            print_validation(&result);
            if !result.is_valid() {
                process::exit(1);
            }
        }

        Command::Test { path, filter } => {
            let test_config = TestConfig {
                test_root: path,
                parser: config,
                ..TestConfig::default()
            };
            let (_, failed, _) = run_all_tests(filter.as_deref(), &test_config);
            if failed > 0 {
                process::exit(1);
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

// ============================================================================
// PARSE COMMAND
// ============================================================================

/// Reads tokens, runs the parser and writes the derivation. Returns whether the token
/// sequence was accepted; `Err` is reserved for failures around the parse itself.
fn handle_parse(
    file: Option<PathBuf>,
    output: &Path,
    format: OutputFormat,
    config: &ParserConfig,
) -> Result<bool, TraceError> {
    let input = match file {
        Some(path) => path,
        None => prompt_for_path()?,
    };
    let tokens = TokenStream::read_file(&input)?;

    match format {
        OutputFormat::Text if output == Path::new(STDOUT_PATH) => {
            let (accepted, sink) = trace_into(tokens, StdoutSink::new(), config);
            sink.finish()?;
            Ok(accepted)
        }
        OutputFormat::Text => {
            let sink = FileSink::create(output)?;
            let (accepted, sink) = trace_into(tokens, sink, config);
            sink.finish()?;
            Ok(accepted)
        }
        OutputFormat::Json => {
            let derivation = derive(tokens, config);
            write_json(output, &derivation)?;
            Ok(derivation.accepted)
        }
    }
}

/// Streams the derivation into `sink`. Steps are not kept in memory.
fn trace_into<S: LogSink>(tokens: TokenStream, sink: S, config: &ParserConfig) -> (bool, S) {
    let mut parser = Parser::with_sink(tokens, sink, config);
    let accepted = parser.parse().is_ok();
    let (sink, _) = parser.into_parts();
    (accepted, sink)
}

fn write_json(output: &Path, derivation: &crate::syntax::Derivation) -> Result<(), TraceError> {
    let output_error = |source: io::Error| TraceError::Output {
        path: output.to_path_buf(),
        source,
    };

    if output == Path::new(STDOUT_PATH) {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        serde_json::to_writer_pretty(&mut writer, derivation).map_err(|e| output_error(e.into()))?;
        return writeln!(writer).map_err(output_error);
    }

    let file = File::create(output).map_err(output_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, derivation).map_err(|e| output_error(e.into()))?;
    writeln!(writer).map_err(output_error)?;
    writer.flush().map_err(output_error)
}

/// Asks for the token file on stdin, the way the tool behaves when run without arguments.
fn prompt_for_path() -> Result<PathBuf, TraceError> {
    print!("Enter input file name: ");
    let stdin_error = |source: io::Error| TraceError::Open {
        path: PathBuf::from("<stdin>"),
        source,
    };
    io::stdout().flush().map_err(stdin_error)?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).map_err(stdin_error)?;
    Ok(PathBuf::from(line.trim()))
}
