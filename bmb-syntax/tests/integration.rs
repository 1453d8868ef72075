//! Integration tests for the BMB syntax front end
//!
//! Drives the public API the way a downstream checker would:
//! - tokenize + parse of complete programs
//! - error-sequence mode and diagnostics
//! - fragment entry points
//! - re-serialization

use bmb_syntax::ast::{Contract, Expr, Item, LineIndex, Type};
use bmb_syntax::lexer::{TokenKind, tokenize};
use bmb_syntax::parser::{
    parse, parse_expression, parse_pattern_str, parse_type_str, parse_with_options,
};
use bmb_syntax::{CompileError, ParseOptions, Program, parse_source};

const SAMPLE: &str = r#"
// Bank account example
use std::io;

@derive(Debug)
pub struct Account { id: i64, balance: i64{ it >= 0 } }

enum TxResult { Ok(i64), Insufficient, Frozen() }

@pure
fn withdraw(acc: &Account, amount: i64{ it > 0 }) -> r: TxResult
  where {
    enough: acc.balance >= amount,
    amount < 1000000,
  }
  = if acc.balance < amount then TxResult::Insufficient else TxResult::Ok(acc.balance - amount);

pub fn total(xs: [i64; 8]) -> i64 pre true post ret >= 0 = {
    let mut sum = 0;
    for i in 0..<8 { sum + xs[i] };
    sum = sum * 2;
    sum
};

fn describe(r: TxResult) -> String = match r {
    TxResult::Ok(left) => "ok",
    TxResult::Insufficient => "insufficient",
    _ => "frozen",
};
"#;

/// Helper to parse a program through the public pipeline
fn parse_program(source: &str) -> bmb_syntax::Result<Program> {
    let tokens = tokenize(source)?;
    parse("test.bmb", source, tokens)
}

/// Helper to check if a program parses
fn parses(source: &str) -> bool {
    parse_program(source).is_ok()
}

// ============================================
// Whole Programs
// ============================================

#[test]
fn test_sample_program_parses() {
    let prog = parse_program(SAMPLE).expect("sample should parse");
    let names: Vec<_> = prog.items.iter().filter_map(Item::name).collect();
    assert_eq!(names, vec!["Account", "TxResult", "withdraw", "total", "describe"]);
}

#[test]
fn test_parse_source_matches_two_step_pipeline() {
    assert_eq!(parse_source("test.bmb", SAMPLE).unwrap(), parse_program(SAMPLE).unwrap());
}

#[test]
fn test_sample_contracts() {
    let prog = parse_source("test.bmb", SAMPLE).unwrap();
    let contracts: Vec<_> = prog
        .functions()
        .map(|f| (f.name.node.as_str(), f.contract.as_ref()))
        .collect();

    assert!(matches!(contracts[0], ("withdraw", Some(Contract::Where(c))) if c.len() == 2));
    assert!(matches!(
        contracts[1],
        ("total", Some(Contract::Legacy { pre: Some(_), post: Some(_) }))
    ));
    assert!(matches!(contracts[2], ("describe", None)));
}

#[test]
fn test_sample_refined_fields() {
    let prog = parse_source("test.bmb", SAMPLE).unwrap();
    let Item::StructDef(account) = &prog.items[1] else {
        panic!("expected struct");
    };
    let balance = &account.fields[1].ty.node;
    assert!(matches!(balance, Type::Refined { constraints, .. } if constraints.len() == 1));
    assert_eq!(balance.to_string(), "i64{ it >= 0 }");
}

#[test]
fn test_sample_reprints_stably() {
    let first = parse_source("test.bmb", SAMPLE).unwrap().to_string();
    let second = parse_source("test.bmb", &first).unwrap().to_string();
    assert_eq!(first, second);
}

#[test]
fn test_sample_json_round_trip() {
    let prog = parse_source("test.bmb", SAMPLE).unwrap();
    let json = serde_json::to_string(&prog).unwrap();
    let back: Program = serde_json::from_str(&json).unwrap();
    assert_eq!(back, prog);
}

// ============================================
// Lexer
// ============================================

#[test]
fn test_token_kinds_and_positions() {
    let source = "fn f() -> i64 =\n  1.5;";
    let tokens = tokenize(source).unwrap();
    let kinds: Vec<_> = tokens.iter().map(|(t, _)| t.kind()).collect();
    assert_eq!(kinds[0], TokenKind::Keyword);
    assert_eq!(kinds[1], TokenKind::Identifier);
    assert!(kinds.contains(&TokenKind::FloatLiteral));

    let index = LineIndex::new(source);
    let (_, float_span) = &tokens[tokens.len() - 2];
    let pos = index.position(float_span.start);
    assert_eq!((pos.line, pos.column), (2, 3));
}

#[test]
fn test_lex_errors() {
    let err = tokenize("fn f() -> i64 = #;").unwrap_err();
    assert!(matches!(err, CompileError::Lexer { .. }));

    let err = tokenize("\"never closed").unwrap_err();
    assert_eq!(err.message(), "unterminated string literal");
}

// ============================================
// Diagnostics
// ============================================

#[test]
fn test_fail_fast_reports_first_error() {
    let err = parse_program("fn a() -> i64 = ;\nfn b() -> = 1;").unwrap_err();
    assert_eq!(err.position().map(|p| p.line), Some(1));
    assert!(err.to_string().starts_with("Parser error at 1:17"));
}

#[test]
fn test_collect_mode_reports_all_items() {
    let source = "fn a() -> i64 = ;\nfn b() -> = 1;\nfn c() -> i64 = 3;";
    let tokens = tokenize(source).unwrap();
    let options = ParseOptions::collect_errors();
    let diagnostics = parse_with_options("test.bmb", source, tokens, &options).unwrap_err();
    let lines: Vec<_> = diagnostics.iter().filter_map(|e| e.position()).map(|p| p.line).collect();
    assert_eq!(lines, vec![1, 2]);
    assert!(diagnostics.to_string().starts_with("2 syntax error(s)"));
}

#[test]
fn test_rejected_programs() {
    assert!(!parses("fn f() -> i32 = ;"));
    assert!(!parses("pub use a;"));
    assert!(!parses("fn f() -> i64 = { x = 1 };"));
    assert!(!parses("fn f() -> i64 = if a then b;"));
    assert!(!parses("fn f(x: i64) -> i64 where { x } pre x = x;"));
    assert!(!parses("struct S { x i64 }"));
}

// ============================================
// Fragment Entry Points
// ============================================

#[test]
fn test_fragment_entry_points() {
    assert!(matches!(parse_expression("a.b.post").unwrap().node, Expr::StateRef { .. }));
    assert_eq!(parse_type_str("[bool; 2]").unwrap().node.to_string(), "[bool; 2]");
    assert_eq!(parse_pattern_str("E::V(a, b)").unwrap().node.to_string(), "E::V(a, b)");

    // fragments must consume the whole input
    assert!(parse_expression("1 2").is_err());
    assert!(parse_type_str("i64 i64").is_err());
}
