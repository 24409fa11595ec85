//! Leftmost-derivation tracking.
//!
//! The tracker owns the current sentential form and the derivation log sink. Every
//! expansion the parser performs is mirrored here as a single-nonterminal rewrite of the
//! leftmost occurrence, and the resulting form is written as one `-> ...` log line.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::{ParseError, TraceError};

// ============================================================================
// LOG SINKS
// ============================================================================

/// Destination for derivation log lines.
pub trait LogSink {
    fn emit(&mut self, line: &str);
}

/// Collects log lines in memory, for tests and programmatic use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogBuffer {
    pub lines: Vec<String>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl LogSink for LogBuffer {
    fn emit(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Writes log lines to a file. The file is created when the sink is opened and flushed
/// when the sink is finished or dropped.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    error: Option<io::Error>,
}

impl FileSink {
    pub fn create(path: &Path) -> Result<Self, TraceError> {
        let file = File::create(path).map_err(|source| TraceError::Output {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            error: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes the file, surfacing the first write error seen.
    pub fn finish(mut self) -> Result<(), TraceError> {
        let flushed = self.writer.flush();
        let path = self.path.clone();
        match self.error.take().map_or(flushed, Err) {
            Ok(()) => Ok(()),
            Err(source) => Err(TraceError::Output { path, source }),
        }
    }
}

impl LogSink for FileSink {
    fn emit(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.writer, "{line}") {
            log::warn!("failed writing to {}: {e}", self.path.display());
            self.error = Some(e);
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

// ============================================================================
// TRACKER
// ============================================================================

/// One recorded expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivationStep {
    pub nonterminal: String,
    pub production: Vec<String>,
    /// The sentential form after the rewrite.
    pub form: String,
}

/// Current sentential form plus the log it is mirrored to. Steps are only kept in memory
/// when recording is switched on; the sink always sees every line.
#[derive(Debug)]
pub struct DerivationTracker<S: LogSink> {
    form: Vec<String>,
    steps: Vec<DerivationStep>,
    record_steps: bool,
    rewrites: usize,
    sink: S,
}

impl<S: LogSink> DerivationTracker<S> {
    /// Opens the log: writes `header`, then the start rule's expansion as
    /// `<start> -> <production>`, which becomes the initial sentential form.
    pub fn open(mut sink: S, header: &str, start: &str, production: Vec<String>) -> Self {
        sink.emit(header);
        sink.emit(&format!("{start} -> {}", production.join(" ")));
        Self {
            form: production,
            steps: Vec::new(),
            record_steps: false,
            rewrites: 0,
            sink,
        }
    }

    pub fn record_steps(&mut self, on: bool) {
        self.record_steps = on;
    }

    /// Replaces the leftmost occurrence of `nonterminal` with `production` and logs the new
    /// form. Fails without touching the form or the log when `nonterminal` is absent.
    pub fn rewrite(&mut self, nonterminal: &str, production: &[String]) -> Result<(), ParseError> {
        let at = self
            .form
            .iter()
            .position(|symbol| symbol == nonterminal)
            .ok_or_else(|| ParseError::ReplacementFailed {
                nonterminal: nonterminal.to_string(),
            })?;
        self.form.splice(at..=at, production.iter().cloned());

        let form = self.current();
        self.sink.emit(&format!("-> {form}"));
        self.rewrites += 1;
        if self.record_steps {
            self.steps.push(DerivationStep {
                nonterminal: nonterminal.to_string(),
                production: production.to_vec(),
                form,
            });
        }
        Ok(())
    }

    /// Writes the single diagnostic line for a failed derivation.
    pub fn fail(&mut self, error: &ParseError) {
        self.sink.emit(&error.to_string());
    }

    /// The space-joined sentential form.
    pub fn current(&self) -> String {
        self.form.join(" ")
    }

    pub fn symbols(&self) -> &[String] {
        &self.form
    }

    pub fn steps(&self) -> &[DerivationStep] {
        &self.steps
    }

    /// Number of rewrites performed, recorded or not.
    pub fn rewrites(&self) -> usize {
        self.rewrites
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (S, Vec<DerivationStep>) {
        (self.sink, self.steps)
    }
}
