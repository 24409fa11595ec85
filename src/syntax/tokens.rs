//! Token source for the parsing engine.
//!
//! Tokens arrive pre-lexed, one per line. The engine never looks at raw source text; it
//! only compares token strings against grammar terminals.

use std::fs;
use std::path::Path;

use crate::errors::TraceError;

/// Ordered, immutable sequence of token strings with a forward-only cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<String>,
    cursor: usize,
}

impl TokenStream {
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            cursor: 0,
        }
    }

    /// Builds a stream from newline-delimited text. A trailing carriage return is stripped
    /// from each line and empty lines are skipped.
    pub fn from_lines(text: &str) -> Self {
        Self::new(
            text.split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line))
                .filter(|line| !line.is_empty()),
        )
    }

    /// Reads a token file. Failing to read it is fatal: no parser is ever built.
    pub fn read_file(path: &Path) -> Result<Self, TraceError> {
        let text = fs::read_to_string(path).map_err(|source| TraceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_lines(&text))
    }

    /// The next unconsumed token, or the empty sentinel once the stream is exhausted.
    pub fn current(&self) -> &str {
        self.peek().unwrap_or("")
    }

    pub fn peek(&self) -> Option<&str> {
        self.tokens.get(self.cursor).map(String::as_str)
    }

    /// Consumes one token. Never moves past the end.
    pub fn advance(&mut self) {
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.tokens.len()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}
