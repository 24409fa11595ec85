//! lltrace Parser - Predictive, Derivation-Tracking LL(1) Driver
//!
//! One generic driver interprets the grammar table. It keeps an explicit stack of pending
//! symbols: expanding a nonterminal picks an alternative from the single lookahead token,
//! records the rewrite with the derivation tracker, then pushes the alternative's symbols
//! so the leftmost one is handled next. Input size never grows the call stack. The first
//! failure ends the derivation through `?` and is written to the log exactly once.

use serde::Serialize;

use crate::config::ParserConfig;
use crate::errors::ParseError;
use crate::syntax::derivation::{DerivationStep, DerivationTracker, LogBuffer, LogSink};
use crate::syntax::grammar::{Alternative, Grammar, Nonterminal, Symbol, GRAMMAR};
use crate::syntax::tokens::TokenStream;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses `tokens` with the built-in grammar into an in-memory derivation.
pub fn derive(tokens: TokenStream, config: &ParserConfig) -> Derivation {
    let mut parser = Parser::with_sink(tokens, LogBuffer::new(), config).recording_steps();
    let result = parser.parse();
    let consumed = parser.cursor();
    let (log, steps) = parser.into_parts();
    Derivation {
        accepted: result.is_ok(),
        log: log.into_lines(),
        steps,
        error: result.err().map(|e| e.to_string()),
        consumed,
    }
}

/// The complete record of one parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Derivation {
    pub accepted: bool,
    pub log: Vec<String>,
    pub steps: Vec<DerivationStep>,
    pub error: Option<String>,
    /// Number of tokens matched before the parse ended.
    pub consumed: usize,
}

impl Derivation {
    /// The last sentential form reached, or the seed form when nothing was expanded.
    pub fn final_form(&self) -> Option<&str> {
        match self.steps.last() {
            Some(step) => Some(&step.form),
            None => self
                .log
                .get(1)
                .and_then(|line| line.split_once(" -> "))
                .map(|(_, form)| form),
        }
    }
}

// ============================================================================
// PARSER
// ============================================================================

/// Work still owed to the derivation. The top of the stack is the leftmost symbol.
#[derive(Debug)]
enum Pending {
    Expand(Nonterminal),
    Terminal(&'static str),
    /// The token that selected the alternative, matched again in place.
    Lookahead(String),
}

pub struct Parser<S: LogSink = LogBuffer> {
    grammar: &'static Grammar,
    start: Option<&'static Alternative>,
    tokens: TokenStream,
    tracker: DerivationTracker<S>,
    line: usize,
    outcome: Option<Result<(), ParseError>>,
}

impl Parser<LogBuffer> {
    /// A parser over the built-in grammar logging to memory with default configuration.
    /// Every step is recorded.
    pub fn new(tokens: TokenStream) -> Self {
        Self::with_sink(tokens, LogBuffer::new(), &ParserConfig::default()).recording_steps()
    }
}

impl<S: LogSink> Parser<S> {
    pub fn with_sink(tokens: TokenStream, sink: S, config: &ParserConfig) -> Self {
        Self::with_grammar(&GRAMMAR, tokens, sink, config)
    }

    /// Builds a parser and opens its derivation log. The log receives the header and the
    /// start rule's expansion immediately. Steps are not kept in memory unless
    /// [`Parser::recording_steps`] is called before parsing.
    pub fn with_grammar(
        grammar: &'static Grammar,
        tokens: TokenStream,
        sink: S,
        config: &ParserConfig,
    ) -> Self {
        let start = grammar.start_alternative();
        let production = start
            .map(|alt| alt.production(tokens.current()))
            .unwrap_or_default();
        log::info!("parser created with {} tokens", tokens.len());
        let tracker =
            DerivationTracker::open(sink, &config.header, grammar.start.name(), production);
        Self {
            grammar,
            start,
            tokens,
            tracker,
            line: config.first_line,
            outcome: None,
        }
    }

    /// Keeps a [`DerivationStep`] for every rewrite, for reports built after the parse.
    pub fn recording_steps(mut self) -> Self {
        self.tracker.record_steps(true);
        self
    }

    /// Runs the derivation: `begin`, then `statements`, then `end.`, stopping at the first
    /// failure. Calling it again returns the recorded outcome without touching the log.
    pub fn parse(&mut self) -> Result<(), ParseError> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let result = self.run();
        match &result {
            Ok(()) => log::info!(
                "derivation accepted after {} rewrites",
                self.tracker.rewrites()
            ),
            Err(err) => {
                log::warn!("derivation failed: {err}");
                self.tracker.fail(err);
            }
        }
        self.outcome = Some(result.clone());
        result
    }

    /// The table-driven loop: pop the leftmost pending symbol, then match or expand it.
    fn run(&mut self) -> Result<(), ParseError> {
        let start = self
            .start
            .ok_or_else(|| self.no_rule(self.grammar.start))?;
        let mut pending = Vec::new();
        schedule(&mut pending, start, self.tokens.current());

        while let Some(next) = pending.pop() {
            match next {
                Pending::Terminal(terminal) => self.match_terminal(terminal)?,
                Pending::Lookahead(token) => self.match_terminal(&token)?,
                Pending::Expand(nonterminal) => {
                    let (alternative, lookahead) = self.expand(nonterminal)?;
                    schedule(&mut pending, alternative, &lookahead);
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Nonterminals
    // ------------------------------------------------------------------------

    /// Expands one nonterminal: select by lookahead and rewrite. Returns the chosen
    /// alternative with the lookahead that chose it.
    fn expand(
        &mut self,
        nonterminal: Nonterminal,
    ) -> Result<(&'static Alternative, String), ParseError> {
        let rule = self
            .grammar
            .rule(nonterminal)
            .ok_or_else(|| self.no_rule(nonterminal))?;
        let lookahead = self.tokens.current().to_string();
        let alternative = rule
            .select(&lookahead)
            .ok_or_else(|| ParseError::NoProduction {
                line: self.line,
                nonterminal: nonterminal.name().to_string(),
                message: rule.mismatch_message(),
            })?;

        let production = alternative.production(&lookahead);
        log::debug!("expand {} -> {:?} on '{}'", rule.lhs, production, lookahead);
        self.tracker.rewrite(rule.lhs.name(), &production)?;
        Ok((alternative, lookahead))
    }

    fn no_rule(&self, nonterminal: Nonterminal) -> ParseError {
        ParseError::NoProduction {
            line: self.line,
            nonterminal: nonterminal.name().to_string(),
            message: format!("No rule for {nonterminal}"),
        }
    }

    // ------------------------------------------------------------------------
    // Terminals
    // ------------------------------------------------------------------------

    /// Consumes the current token if it equals `expected`.
    fn match_terminal(&mut self, expected: &str) -> Result<(), ParseError> {
        let found = self.tokens.current();
        if found != expected {
            return Err(ParseError::UnexpectedToken {
                line: self.line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        log::debug!("match '{expected}' at line {}", self.line);
        self.tokens.advance();
        self.line += 1;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Current diagnostic line counter.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn cursor(&self) -> usize {
        self.tokens.cursor()
    }

    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    /// The current sentential form, space-joined.
    pub fn form(&self) -> String {
        self.tracker.current()
    }

    pub fn steps(&self) -> &[DerivationStep] {
        self.tracker.steps()
    }

    pub fn sink(&self) -> &S {
        self.tracker.sink()
    }

    pub fn outcome(&self) -> Option<&Result<(), ParseError>> {
        self.outcome.as_ref()
    }

    /// Releases the log sink together with the recorded steps.
    pub fn into_parts(self) -> (S, Vec<DerivationStep>) {
        self.tracker.into_parts()
    }
}

/// Pushes an alternative's symbols in reverse so the leftmost one is popped first.
fn schedule(pending: &mut Vec<Pending>, alternative: &'static Alternative, lookahead: &str) {
    pending.extend(alternative.symbols.iter().rev().map(|symbol| match *symbol {
        Symbol::Terminal(terminal) => Pending::Terminal(terminal),
        Symbol::Nonterminal(nonterminal) => Pending::Expand(nonterminal),
        Symbol::Lookahead => Pending::Lookahead(lookahead.to_string()),
    }));
}
