//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for colorizing status lines, printing the grammar and
//! validation reports, and streaming a derivation to stdout. By centralizing output logic
//! here, we ensure a consistent user experience across all commands.

use std::io::{self, Write};
use std::path::PathBuf;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::TraceError;
use crate::syntax::{Grammar, LogSink};
use crate::validation::ValidationResult;

// ============================================================================
// OUTPUT SINKS
// ============================================================================

/// StdoutSink: writes derivation lines to stdout, used for `--output -`. The first write
/// error (a closed pipe, say) stops further output and is reported by [`StdoutSink::finish`].
pub struct StdoutSink<W: Write = io::Stdout> {
    writer: W,
    error: Option<io::Error>,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdoutSink<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// Flushes, surfacing the first write error seen.
    pub fn finish(mut self) -> Result<(), TraceError> {
        let flushed = self.writer.flush();
        match self.error.take().map_or(flushed, Err) {
            Ok(()) => Ok(()),
            Err(source) => Err(TraceError::Output {
                path: PathBuf::from("-"),
                source,
            }),
        }
    }
}

impl<W: Write> LogSink for StdoutSink<W> {
    fn emit(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.writer, "{line}") {
            log::warn!("failed writing derivation to stdout: {e}");
            self.error = Some(e);
        }
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS: User-facing CLI output utilities
// ============================================================================

/// Prints a green status line to stdout.
pub fn print_success(message: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    print_colored(&mut stdout, Color::Green, message);
}

/// Prints a red status line to stderr.
pub fn print_failure(message: &str) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    print_colored(&mut stderr, Color::Red, message);
}

/// Prints the grammar table with a heading.
pub fn print_grammar(grammar: &Grammar) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
    let _ = writeln!(stdout, "--- start symbol: {} ---", grammar.start);
    let _ = stdout.reset();
    let _ = write!(stdout, "{grammar}");
}

/// Prints a grammar validation report.
pub fn print_validation(result: &ValidationResult) {
    if result.is_valid() {
        print_success("Grammar validation passed");
    } else {
        print_failure("Grammar validation failed:");
        for err in &result.errors {
            eprintln!("• {err}");
        }
    }

    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    for warning in &result.warnings {
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
        let _ = write!(stderr, "warning");
        let _ = stderr.reset();
        let _ = writeln!(stderr, ": {warning}");
    }
    for suggestion in &result.suggestions {
        let _ = writeln!(stderr, "note: {suggestion}");
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_colored(stream: &mut StandardStream, color: Color, message: &str) {
    let _ = stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = writeln!(stream, "{message}");
    let _ = stream.reset();
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts one line, then behaves like a pipe whose reader went away.
    struct ClosedAfterFirst {
        written: Vec<u8>,
    }

    impl Write for ClosedAfterFirst {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written.contains(&b'\n') {
                return Err(io::Error::from(io::ErrorKind::BrokenPipe));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stdout_sink_stops_at_first_write_error() {
        let mut sink = StdoutSink::with_writer(ClosedAfterFirst {
            written: Vec::new(),
        });
        sink.emit("Left most derivation:");
        sink.emit("program -> begin statements end.");
        sink.emit("-> begin statement , moreStmts end.");
        assert_eq!(sink.writer.written, b"Left most derivation:\n");

        let err = sink.finish().unwrap_err();
        assert!(matches!(
            err,
            TraceError::Output { ref source, .. } if source.kind() == io::ErrorKind::BrokenPipe
        ));
    }

    #[test]
    fn stdout_sink_writes_lines_in_order() {
        let mut sink = StdoutSink::with_writer(Vec::new());
        sink.emit("first");
        sink.emit("second");
        assert_eq!(sink.writer, b"first\nsecond\n");
        assert!(sink.finish().is_ok());
    }
}
