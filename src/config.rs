//! Parser configuration.
//!
//! Configuration is optional. When present it is a YAML mapping; every key falls back to
//! its default:
//!
//! ```yaml
//! header: "Left most derivation:"
//! first_line: 0
//! output: derivation.txt
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::TraceError;

pub const DEFAULT_HEADER: &str = "Left most derivation:";
pub const DEFAULT_OUTPUT: &str = "derivation.txt";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// First line of every derivation log.
    pub header: String,
    /// Starting value of the diagnostic line counter. Each matched terminal adds one.
    pub first_line: usize,
    /// Where the CLI writes the derivation log.
    pub output: PathBuf,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            first_line: 0,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl ParserConfig {
    pub fn from_yaml(path: &Path, content: &str) -> Result<Self, TraceError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| TraceError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let content = fs::read_to_string(path).map_err(|source| TraceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(path, &content)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, TraceError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
