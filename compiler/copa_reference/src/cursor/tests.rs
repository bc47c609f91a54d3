use super::*;
use crate::lexer::tokenize;

fn cursor(source: &str) -> Cursor<'_> {
    match tokenize(source) {
        Ok(tokens) => Cursor::new(source, tokens),
        Err(e) => panic!("tokenize failed: {e}"),
    }
}

#[test]
fn advance_stops_at_eof() {
    let mut c = cursor("a");
    assert!(c.check(TokenKind::Ident));
    c.advance();
    assert!(c.at_end());
    c.advance();
    assert!(c.at_end());
}

#[test]
fn peek_clamps_to_eof() {
    let c = cursor("a.b");
    assert_eq!(c.peek(1).kind, TokenKind::Dot);
    assert_eq!(c.peek(10).kind, TokenKind::Eof);
}

#[test]
fn keyword_checks_use_token_text() {
    let c = cursor("global::X");
    assert!(c.is_keyword("global"));
    assert!(!c.is_keyword("glob"));
    assert!(c.is_keyword_at(2, "X"));
}

#[test]
fn expect_reports_found_token() {
    let mut c = cursor("(");
    assert_eq!(
        c.expect(TokenKind::Ident),
        Err(ReferenceError::Expected {
            expected: "identifier",
            found: "`(`",
            offset: 0,
        })
    );
    assert!(c.eat(TokenKind::LParen));
}

#[test]
fn rest_slices_from_offset() {
    let c = cursor("Foo bar");
    assert_eq!(c.rest(4), "bar");
}
