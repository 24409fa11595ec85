//! The toy language's grammar, encoded as data.
//!
//! Every nonterminal owns one [`Rule`]: an ordered list of [`Alternative`]s, each guarded by
//! the single lookahead token that selects it. The parser interprets these rules with one
//! generic driver, so the table below is the only place the language is defined.
//!
//! ```text
//! program      -> begin statements end.
//! statements   -> statement , moreStmts
//! moreStmts    -> ε | statements
//! statement    -> conditional | loop | io | assignment | nothing
//! conditional  -> if ( condition ) statement else statement
//! loop         -> while ( condition ) perform statement
//! io           -> input | output
//! input        -> get ( id )
//! output       -> put ( id )
//! assignment   -> id = expr
//! expr         -> ( expr ) | terms
//! terms        -> term moreTerms
//! moreTerms    -> op terms | ε            op ∈ { + - }
//! term         -> factor moreFactors
//! moreFactors  -> op term | ε             op ∈ { * / }
//! factor       -> id | num
//! condition    -> factor rel factor
//! rel          -> > | < | == | !=
//! ```

use std::fmt;

use serde::Serialize;

// ============================================================================
// SYMBOLS
// ============================================================================

/// Grammar nonterminals, in rule-table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Nonterminal {
    Program,
    Statements,
    MoreStmts,
    Statement,
    Conditional,
    Loop,
    Io,
    Input,
    Output,
    Assignment,
    Expr,
    Terms,
    MoreTerms,
    Term,
    MoreFactors,
    Factor,
    Condition,
    Rel,
}

impl Nonterminal {
    pub const ALL: [Nonterminal; 18] = [
        Nonterminal::Program,
        Nonterminal::Statements,
        Nonterminal::MoreStmts,
        Nonterminal::Statement,
        Nonterminal::Conditional,
        Nonterminal::Loop,
        Nonterminal::Io,
        Nonterminal::Input,
        Nonterminal::Output,
        Nonterminal::Assignment,
        Nonterminal::Expr,
        Nonterminal::Terms,
        Nonterminal::MoreTerms,
        Nonterminal::Term,
        Nonterminal::MoreFactors,
        Nonterminal::Factor,
        Nonterminal::Condition,
        Nonterminal::Rel,
    ];

    /// The symbol as it appears in sentential forms.
    pub const fn name(self) -> &'static str {
        match self {
            Nonterminal::Program => "program",
            Nonterminal::Statements => "statements",
            Nonterminal::MoreStmts => "moreStmts",
            Nonterminal::Statement => "statement",
            Nonterminal::Conditional => "conditional",
            Nonterminal::Loop => "loop",
            Nonterminal::Io => "io",
            Nonterminal::Input => "input",
            Nonterminal::Output => "output",
            Nonterminal::Assignment => "assignment",
            Nonterminal::Expr => "expr",
            Nonterminal::Terms => "terms",
            Nonterminal::MoreTerms => "moreTerms",
            Nonterminal::Term => "term",
            Nonterminal::MoreFactors => "moreFactors",
            Nonterminal::Factor => "factor",
            Nonterminal::Condition => "condition",
            Nonterminal::Rel => "rel",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|nt| nt.name() == name)
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One symbol on the right-hand side of a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Terminal(&'static str),
    Nonterminal(Nonterminal),
    /// The lookahead token that selected the alternative (the `op` in `moreTerms -> op terms`).
    Lookahead,
}

impl Symbol {
    /// Resolves the symbol to the text it contributes to a sentential form.
    pub fn resolve<'a>(&self, lookahead: &'a str) -> &'a str {
        match self {
            Symbol::Terminal(t) => *t,
            Symbol::Nonterminal(nt) => nt.name(),
            Symbol::Lookahead => lookahead,
        }
    }
}

// ============================================================================
// RULES
// ============================================================================

/// Which lookahead tokens select an alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// The rule's only alternative; taken unconditionally.
    Always,
    /// Taken when the lookahead is one of these tokens.
    OneOf(&'static [&'static str]),
    /// Taken when no earlier alternative matched.
    Otherwise,
}

impl Guard {
    pub fn admits(&self, lookahead: &str) -> bool {
        match self {
            Guard::Always | Guard::Otherwise => true,
            Guard::OneOf(tokens) => tokens.iter().any(|token| *token == lookahead),
        }
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, Guard::Always | Guard::Otherwise)
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::Always => f.write_str("always"),
            Guard::Otherwise => f.write_str("otherwise"),
            Guard::OneOf(tokens) => write!(f, "lookahead ∈ {{{}}}", tokens.join(", ")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alternative {
    pub guard: Guard,
    pub symbols: &'static [Symbol],
}

impl Alternative {
    /// The replacement symbols written into the sentential form when this alternative fires.
    pub fn production(&self, lookahead: &str) -> Vec<String> {
        self.symbols
            .iter()
            .map(|symbol| symbol.resolve(lookahead).to_string())
            .collect()
    }

    pub fn is_epsilon(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub lhs: Nonterminal,
    pub alternatives: &'static [Alternative],
    /// Diagnostic used when no alternative admits the lookahead.
    pub on_mismatch: Option<&'static str>,
}

impl Rule {
    /// LL(1) selection: the first alternative whose guard admits the lookahead.
    pub fn select(&self, lookahead: &str) -> Option<&'static Alternative> {
        let alternatives: &'static [Alternative] = self.alternatives;
        alternatives.iter().find(|alt| alt.guard.admits(lookahead))
    }

    pub fn mismatch_message(&self) -> String {
        match self.on_mismatch {
            Some(message) => message.to_string(),
            None => format!("No production for {}", self.lhs),
        }
    }

    /// Whether some lookahead leaves this rule without an alternative.
    pub fn can_fail(&self) -> bool {
        !self.alternatives.iter().any(|alt| alt.guard.is_catch_all())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    pub start: Nonterminal,
    /// One rule per nonterminal, indexed by the nonterminal's declaration order.
    pub rules: &'static [Rule],
}

impl Grammar {
    /// The rule stored in `nonterminal`'s slot. A well-formed table has `rule.lhs ==
    /// nonterminal`; see the grammar validators.
    pub fn rule(&self, nonterminal: Nonterminal) -> Option<&'static Rule> {
        let rules: &'static [Rule] = self.rules;
        rules.get(nonterminal as usize)
    }

    /// The start rule's unconditional alternative, which seeds the sentential form.
    pub fn start_alternative(&self) -> Option<&'static Alternative> {
        self.rule(self.start)?.alternatives.first()
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = Nonterminal::ALL
            .iter()
            .map(|nt| nt.name().len())
            .max()
            .unwrap_or(0);
        for rule in self.rules {
            for (i, alt) in rule.alternatives.iter().enumerate() {
                let lhs = if i == 0 { rule.lhs.name() } else { "" };
                let rhs = if alt.is_epsilon() {
                    "ε".to_string()
                } else {
                    alt.symbols
                        .iter()
                        .map(|symbol| symbol.resolve("<lookahead>"))
                        .collect::<Vec<_>>()
                        .join(" ")
                };
                writeln!(f, "{lhs:<width$} -> {rhs:<40} [{}]", alt.guard)?;
            }
            if let Some(message) = rule.on_mismatch {
                writeln!(f, "{:<width$} -> FAIL \"{message}\"", "")?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// THE GRAMMAR
// ============================================================================

use Nonterminal as N;
use Symbol::{Lookahead as LA, Nonterminal as NT, Terminal as T};

const fn always(symbols: &'static [Symbol]) -> Alternative {
    Alternative {
        guard: Guard::Always,
        symbols,
    }
}

const fn when(tokens: &'static [&'static str], symbols: &'static [Symbol]) -> Alternative {
    Alternative {
        guard: Guard::OneOf(tokens),
        symbols,
    }
}

const fn otherwise(symbols: &'static [Symbol]) -> Alternative {
    Alternative {
        guard: Guard::Otherwise,
        symbols,
    }
}

const fn rule(lhs: Nonterminal, alternatives: &'static [Alternative]) -> Rule {
    Rule {
        lhs,
        alternatives,
        on_mismatch: None,
    }
}

const fn rule_or_fail(
    lhs: Nonterminal,
    alternatives: &'static [Alternative],
    message: &'static str,
) -> Rule {
    Rule {
        lhs,
        alternatives,
        on_mismatch: Some(message),
    }
}

pub static GRAMMAR: Grammar = Grammar {
    start: N::Program,
    rules: &[
        rule(N::Program, &[always(&[T("begin"), NT(N::Statements), T("end.")])]),
        rule(N::Statements, &[always(&[NT(N::Statement), T(","), NT(N::MoreStmts)])]),
        rule(N::MoreStmts, &[when(&["end."], &[]), otherwise(&[NT(N::Statements)])]),
        rule_or_fail(
            N::Statement,
            &[
                when(&["if"], &[NT(N::Conditional)]),
                when(&["while"], &[NT(N::Loop)]),
                when(&["get", "put"], &[NT(N::Io)]),
                when(&["id"], &[NT(N::Assignment)]),
                when(&["nothing"], &[T("nothing")]),
            ],
            "Unexpected statement",
        ),
        rule(
            N::Conditional,
            &[always(&[
                T("if"),
                T("("),
                NT(N::Condition),
                T(")"),
                NT(N::Statement),
                T("else"),
                NT(N::Statement),
            ])],
        ),
        rule(
            N::Loop,
            &[always(&[
                T("while"),
                T("("),
                NT(N::Condition),
                T(")"),
                T("perform"),
                NT(N::Statement),
            ])],
        ),
        rule_or_fail(
            N::Io,
            &[when(&["get"], &[NT(N::Input)]), when(&["put"], &[NT(N::Output)])],
            "Expected 'get' or 'put'",
        ),
        rule(N::Input, &[always(&[T("get"), T("("), T("id"), T(")")])]),
        rule(N::Output, &[always(&[T("put"), T("("), T("id"), T(")")])]),
        rule(N::Assignment, &[always(&[T("id"), T("="), NT(N::Expr)])]),
        rule(
            N::Expr,
            &[
                when(&["("], &[T("("), NT(N::Expr), T(")")]),
                otherwise(&[NT(N::Terms)]),
            ],
        ),
        rule(N::Terms, &[always(&[NT(N::Term), NT(N::MoreTerms)])]),
        rule(
            N::MoreTerms,
            &[when(&["+", "-"], &[LA, NT(N::Terms)]), otherwise(&[])],
        ),
        rule(N::Term, &[always(&[NT(N::Factor), NT(N::MoreFactors)])]),
        rule(
            N::MoreFactors,
            &[when(&["*", "/"], &[LA, NT(N::Term)]), otherwise(&[])],
        ),
        rule_or_fail(N::Factor, &[when(&["id", "num"], &[LA])], "Expected factor"),
        rule(
            N::Condition,
            &[always(&[NT(N::Factor), NT(N::Rel), NT(N::Factor)])],
        ),
        rule_or_fail(
            N::Rel,
            &[when(&[">", "<", "==", "!="], &[LA])],
            "Expected relational operator",
        ),
    ],
};
