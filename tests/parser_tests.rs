// tests/parser_tests.rs

use lltrace::syntax::{derive, LogBuffer, Parser, TokenStream};
use lltrace::{ErrorCategory, ParseError, ParserConfig};

// A helper to parse a whitespace-separated token sentence with default configuration.
fn parse(sentence: &str) -> (Result<(), ParseError>, Vec<String>) {
    let mut parser = Parser::new(TokenStream::new(sentence.split_whitespace()));
    let result = parser.parse();
    let (log, _) = parser.into_parts();
    (result, log.into_lines())
}

fn error_message(sentence: &str) -> String {
    parse(sentence).0.unwrap_err().to_string()
}

// ---
// Acceptance
// ---

#[test]
fn test_grammar_sentences_end_in_their_token_stream() {
    let sentences = [
        "begin id = num , end.",
        "begin if ( id > num ) id = num else id = num , end.",
        "begin while ( num != id ) perform get ( id ) , end.",
        "begin get ( id ) , put ( id ) , end.",
        "begin nothing , nothing , end.",
        "begin id = ( id + num ) , end.",
        "begin id = id * num / id - num + id , end.",
        "begin if ( id == id ) while ( id < num ) perform nothing else put ( id ) , end.",
    ];
    for sentence in sentences {
        let (result, log) = parse(sentence);
        assert!(result.is_ok(), "{sentence}: {result:?}");
        assert_eq!(log.last().map(String::as_str), Some(format!("-> {sentence}").as_str()));
    }
}

#[test]
fn test_conditional_scenario_log_shape() {
    let (result, log) = parse("begin if ( id > num ) id = num else id = num , end.");
    assert!(result.is_ok());
    assert_eq!(log[0], "Left most derivation:");
    assert_eq!(log[1], "program -> begin statements end.");
    assert_eq!(log[2], "-> begin statement , moreStmts end.");
    assert_eq!(log[3], "-> begin conditional , moreStmts end.");
    assert_eq!(
        log[4],
        "-> begin if ( condition ) statement else statement , moreStmts end."
    );
    assert!(log.iter().skip(2).all(|line| line.starts_with("-> ")));
}

#[test]
fn test_identical_input_gives_identical_log() {
    let sentence = "begin while ( id < num ) perform id = id + num , end.";
    assert_eq!(parse(sentence), parse(sentence));
}

#[test]
fn test_tokens_after_end_are_left_unconsumed() {
    let derivation = derive(
        TokenStream::new(["begin", "nothing", ",", "end.", "id"]),
        &ParserConfig::default(),
    );
    assert!(derivation.accepted);
    assert_eq!(derivation.consumed, 4);
}

// ---
// Comma placement
// ---

#[test]
fn test_last_top_level_statement_needs_a_comma() {
    assert_eq!(
        error_message("begin id = num end."),
        "Error at line 4: Expected ',', found 'end.'"
    );
}

#[test]
fn test_nested_bodies_take_no_comma() {
    assert_eq!(
        error_message("begin if ( id > num ) id = num , else nothing , end."),
        "Error at line 10: Expected 'else', found ','"
    );
    assert!(parse("begin while ( id > num ) perform nothing , end.").0.is_ok());
}

// ---
// Diagnostics
// ---

#[test]
fn test_syntax_errors_carry_their_rule_message() {
    assert_eq!(
        error_message("begin id = + , end."),
        "Error at line 3: Expected factor"
    );
    assert_eq!(
        error_message("begin id = num ,"),
        "Error at line 5: Unexpected statement"
    );
    assert_eq!(
        error_message("begin id = ( id ) + num , end."),
        "Error at line 6: Expected ',', found '+'"
    );
    assert_eq!(
        error_message("begin while ( id = num ) perform nothing , end."),
        "Error at line 4: Expected relational operator"
    );
}

#[test]
fn test_failure_writes_exactly_one_diagnostic_last() {
    let (result, log) = parse("begin id end.");
    let err = result.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Syntax);
    assert_eq!(log.iter().filter(|l| l.starts_with("Error")).count(), 1);
    assert_eq!(log.last(), Some(&"Error at line 2: Expected '=', found 'end.'".to_string()));
}

#[test]
fn test_empty_stream_fails_on_begin() {
    assert_eq!(error_message(""), "Error at line 0: Expected 'begin', found ''");
}

#[test]
fn test_custom_header_and_line_base() {
    let config = ParserConfig {
        header: "Derivation:".into(),
        first_line: 1,
        ..ParserConfig::default()
    };
    let mut parser = Parser::with_sink(
        TokenStream::new(["begin", "id", "end."]),
        LogBuffer::new(),
        &config,
    );
    let err = parser.parse().unwrap_err();
    assert_eq!(err.to_string(), "Error at line 3: Expected '=', found 'end.'");
    assert_eq!(parser.sink().lines[0], "Derivation:");
}

#[test]
fn test_derivation_serializes_to_json() {
    let derivation = derive(
        TokenStream::new(["begin", "id", "end."]),
        &ParserConfig::default(),
    );
    let json = serde_json::to_value(&derivation).unwrap();
    assert_eq!(json["accepted"], false);
    assert_eq!(json["error"], "Error at line 2: Expected '=', found 'end.'");
    assert_eq!(json["steps"][0]["nonterminal"], "statements");
}
