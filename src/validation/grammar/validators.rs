use std::collections::{BTreeSet, HashMap};

use crate::syntax::grammar::{Grammar, Guard, Nonterminal, Symbol};
use crate::validation::{ValidationReporter, ValidationResult};

/// Validates the encoded grammar table for LL(1) well-formedness.
/// Each validator focuses on a single validation concern
pub struct GrammarValidators;

impl GrammarValidators {
    /// Checks that every nonterminal owns exactly one rule, stored in its declaration slot.
    pub fn check_rule_table(grammar: &Grammar, result: &mut ValidationResult) {
        for (slot, expected) in Nonterminal::ALL.into_iter().enumerate() {
            match grammar.rules.get(slot) {
                None => result.report_error(format!("Rule for '{expected}' is missing")),
                Some(rule) if rule.lhs != expected => result.report_error(format!(
                    "Rule slot {slot} holds '{}' but '{expected}' was expected",
                    rule.lhs
                )),
                Some(_) => {}
            }
        }

        for rule in grammar.rules.iter().skip(Nonterminal::ALL.len()) {
            result.report_error(format!("Extra rule for '{}' past the end of the table", rule.lhs));
        }
    }

    /// Checks that no lookahead token selects two alternatives of the same rule.
    pub fn check_disjoint_lookaheads(grammar: &Grammar, result: &mut ValidationResult) {
        for rule in grammar.rules {
            let mut owners: HashMap<&str, usize> = HashMap::new();
            for (index, alt) in rule.alternatives.iter().enumerate() {
                let Guard::OneOf(tokens) = alt.guard else {
                    continue;
                };
                for &token in tokens {
                    if let Some(first) = owners.insert(token, index) {
                        result.report_error(format!(
                            "Rule '{}' selects alternatives {first} and {index} on '{token}'",
                            rule.lhs
                        ));
                    }
                }
            }
        }
    }

    /// Checks that a catch-all alternative appears at most once and only in last position.
    pub fn check_catch_all_placement(grammar: &Grammar, result: &mut ValidationResult) {
        for rule in grammar.rules {
            let catch_alls: Vec<usize> = rule
                .alternatives
                .iter()
                .enumerate()
                .filter(|(_, alt)| alt.guard.is_catch_all())
                .map(|(index, _)| index)
                .collect();

            if catch_alls.len() > 1 {
                result.report_error(format!(
                    "Rule '{}' has {} catch-all alternatives",
                    rule.lhs,
                    catch_alls.len()
                ));
                continue;
            }

            let Some(&index) = catch_alls.first() else {
                continue;
            };
            if index + 1 != rule.alternatives.len() {
                result.report_error(format!(
                    "Rule '{}' has a catch-all alternative at position {index} that shadows the rest",
                    rule.lhs
                ));
            }
        }
    }

    /// Checks that rules which can reject a lookahead say why.
    pub fn check_failure_messages(grammar: &Grammar, result: &mut ValidationResult) {
        for rule in grammar.rules {
            match (rule.can_fail(), rule.on_mismatch) {
                (true, None) => result.report_warning(format!(
                    "Rule '{}' can reject a lookahead but has no failure message",
                    rule.lhs
                )),
                (false, Some(_)) => result.report_suggestion(format!(
                    "Rule '{}' has a failure message that can never be used",
                    rule.lhs
                )),
                _ => {}
            }
        }
    }

    /// Checks that every nonterminal is reachable from the start symbol.
    pub fn check_reachability(grammar: &Grammar, result: &mut ValidationResult) {
        let mut reached = BTreeSet::from([grammar.start]);
        let mut pending = vec![grammar.start];

        while let Some(nonterminal) = pending.pop() {
            let Some(rule) = grammar.rules.iter().find(|rule| rule.lhs == nonterminal) else {
                continue;
            };
            for alt in rule.alternatives {
                for symbol in alt.symbols {
                    if let Symbol::Nonterminal(next) = *symbol {
                        if reached.insert(next) {
                            pending.push(next);
                        }
                    }
                }
            }
        }

        for rule in grammar.rules {
            if !reached.contains(&rule.lhs) {
                result.report_warning(format!(
                    "Rule '{}' is unreachable from '{}'",
                    rule.lhs, grammar.start
                ));
            }
        }
    }
}
