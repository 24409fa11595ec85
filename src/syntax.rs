//! Syntax module for the lltrace toy language
//!
//! Holds the token stream, the grammar table, the derivation tracker and the predictive
//! parser that ties them together.

pub mod derivation;
pub mod grammar;
pub mod parser;
pub mod tokens;

pub use derivation::{DerivationStep, DerivationTracker, FileSink, LogBuffer, LogSink};
pub use grammar::{Alternative, Grammar, Guard, Nonterminal, Rule, Symbol, GRAMMAR};
pub use parser::{derive, Derivation, Parser};
pub use tokens::TokenStream;
