pub mod grammar;

// Re-exports for concise imports
pub use grammar::{validate_builtin_grammar, validate_grammar, ValidationReporter, ValidationResult};
