//! lltrace error handling.
//!
//! Two layers of errors exist:
//! - [`ParseError`]: syntax and internal-consistency failures raised while deriving. The
//!   `Display` text of a `ParseError` is exactly the diagnostic line written to the
//!   derivation log.
//! - [`TraceError`]: everything that can fail around the engine (reading tokens, opening the
//!   derivation log, loading configuration, loading scenario files), plus parse failures
//!   surfaced to the CLI.
//!
//! Both implement [`miette::Diagnostic`] so the CLI can render them with codes and help.

use std::fmt;
use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// ERROR CLASSIFICATION
// ============================================================================

/// Coarse error classification used by tests and the scenario harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Token source or derivation log could not be read or written
    Io,
    /// Lookahead has no production, or an expected terminal is missing
    Syntax,
    /// Engine and grammar encoding disagree
    Internal,
    /// Configuration or scenario files are malformed
    Config,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Io => "Io",
            ErrorCategory::Syntax => "Syntax",
            ErrorCategory::Internal => "Internal",
            ErrorCategory::Config => "Config",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// PARSE ERRORS
// ============================================================================

/// A failure raised while deriving. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// `match` found a different token (or the end-of-stream sentinel).
    #[error("Error at line {line}: Expected '{expected}', found '{found}'")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },
    /// No alternative of `nonterminal` accepts the lookahead.
    #[error("Error at line {line}: {message}")]
    NoProduction {
        line: usize,
        nonterminal: String,
        message: String,
    },
    /// The rewrite target does not occur in the sentential form.
    #[error("Error: Replacement failed for {nonterminal}")]
    ReplacementFailed { nonterminal: String },
}

impl ParseError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnexpectedToken { .. } | Self::NoProduction { .. } => ErrorCategory::Syntax,
            Self::ReplacementFailed { .. } => ErrorCategory::Internal,
        }
    }

    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnexpectedToken { .. } => "parse::unexpected_token",
            Self::NoProduction { .. } => "parse::no_production",
            Self::ReplacementFailed { .. } => "internal::replacement_failed",
        }
    }

    /// Diagnostic line number, when the error is tied to a position.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::UnexpectedToken { line, .. } | Self::NoProduction { line, .. } => Some(*line),
            Self::ReplacementFailed { .. } => None,
        }
    }
}

impl Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("lltrace::{}", self.code_suffix())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self {
            Self::UnexpectedToken { found, .. } if found.is_empty() => {
                "the token stream ended early".to_string()
            }
            Self::UnexpectedToken { .. } => "check the token sequence against the grammar".into(),
            Self::NoProduction { nonterminal, .. } => {
                format!("run `lltrace grammar` to list the tokens that can start {nonterminal}")
            }
            Self::ReplacementFailed { .. } => {
                "This is an internal engine error. Please report this as a bug.".into()
            }
        };
        Some(Box::new(help))
    }
}

// ============================================================================
// TOP-LEVEL ERRORS
// ============================================================================

/// Errors surfaced by the library's IO-facing API and the CLI.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Could not open file {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not write derivation file {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
    #[error("Could not load scenarios from {}: {message}", path.display())]
    Scenario { path: PathBuf, message: String },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl TraceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Open { .. } | Self::Output { .. } => ErrorCategory::Io,
            Self::Config { .. } | Self::Scenario { .. } => ErrorCategory::Config,
            Self::Parse(err) => err.category(),
        }
    }
}

impl Diagnostic for TraceError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self {
            Self::Open { .. } => "lltrace::io::open".to_string(),
            Self::Output { .. } => "lltrace::io::output".to_string(),
            Self::Config { .. } => "lltrace::config::invalid".to_string(),
            Self::Scenario { .. } => "lltrace::harness::load".to_string(),
            Self::Parse(err) => format!("lltrace::{}", err.code_suffix()),
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Self::Open { .. } => Some(Box::new("the token file must exist and be readable")),
            Self::Config { .. } => Some(Box::new(
                "recognised keys are `header`, `first_line` and `output`",
            )),
            Self::Parse(err) => err.help(),
            _ => None,
        }
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints an error with full miette diagnostics to stderr.
pub fn print_error(error: TraceError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_lines_match_log_format() {
        let mismatch = ParseError::UnexpectedToken {
            line: 2,
            expected: "=".into(),
            found: "end.".into(),
        };
        assert_eq!(
            mismatch.to_string(),
            "Error at line 2: Expected '=', found 'end.'"
        );

        let no_production = ParseError::NoProduction {
            line: 4,
            nonterminal: "factor".into(),
            message: "Expected factor".into(),
        };
        assert_eq!(no_production.to_string(), "Error at line 4: Expected factor");

        let internal = ParseError::ReplacementFailed {
            nonterminal: "moreTerms".into(),
        };
        assert_eq!(internal.to_string(), "Error: Replacement failed for moreTerms");
    }

    #[test]
    fn categories_separate_syntax_from_internal() {
        let internal = ParseError::ReplacementFailed {
            nonterminal: "rel".into(),
        };
        assert_eq!(internal.category(), ErrorCategory::Internal);
        assert_eq!(internal.line(), None);

        let wrapped = TraceError::from(ParseError::UnexpectedToken {
            line: 0,
            expected: "begin".into(),
            found: String::new(),
        });
        assert_eq!(wrapped.category(), ErrorCategory::Syntax);
    }

    #[test]
    fn report_carries_code_and_help() {
        let err = TraceError::from(ParseError::UnexpectedToken {
            line: 0,
            expected: "begin".into(),
            found: String::new(),
        });
        let output = format!("{:?}", miette::Report::new(err));
        assert!(output.contains("lltrace::parse::unexpected_token"));
        assert!(output.contains("the token stream ended early"));
    }
}
