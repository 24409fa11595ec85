pub mod validators;

use crate::syntax::grammar::{Grammar, GRAMMAR};

// =====================
// Core Data Structures
// =====================

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

// =====================
// Traits
// =====================

pub trait ValidationReporter {
    fn report_error(&mut self, message: impl Into<String>);
    fn report_warning(&mut self, message: impl Into<String>);
    fn report_suggestion(&mut self, message: impl Into<String>);
}

impl ValidationReporter for ValidationResult {
    fn report_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
    fn report_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
    fn report_suggestion(&mut self, message: impl Into<String>) {
        self.suggestions.push(message.into());
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
    /// No errors and no warnings.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

// =====================
// Public API
// =====================

/// Runs every LL(1) table check over `grammar`.
pub fn validate_grammar(grammar: &Grammar) -> ValidationResult {
    let mut result = ValidationResult::new();

    use validators::GrammarValidators;
    GrammarValidators::check_rule_table(grammar, &mut result);
    GrammarValidators::check_disjoint_lookaheads(grammar, &mut result);
    GrammarValidators::check_catch_all_placement(grammar, &mut result);
    GrammarValidators::check_failure_messages(grammar, &mut result);
    GrammarValidators::check_reachability(grammar, &mut result);

    log::debug!(
        "grammar validation: {} errors, {} warnings",
        result.errors.len(),
        result.warnings.len()
    );
    result
}

/// Validates the grammar the parser ships with.
pub fn validate_builtin_grammar() -> ValidationResult {
    validate_grammar(&GRAMMAR)
}
