//! lltrace: a predictive, derivation-tracking LL(1) parser for a small imperative language.
//!
//! The parser reads a pre-lexed token stream and records every leftmost rewrite it performs,
//! producing a derivation log that ends either in the accepted sentence or in a single
//! diagnostic line.

pub use crate::config::ParserConfig;
pub use crate::errors::{ErrorCategory, ParseError, TraceError};
pub use crate::syntax::{derive, Derivation, Parser, TokenStream};

pub mod cli;
pub mod config;
pub mod errors;
pub mod syntax;
pub mod test_harness;
pub mod validation;
