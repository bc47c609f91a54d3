//! Tokenizer for reference strings.
//!
//! References are short, so the lexer produces the whole token list up front.
//! Whitespace is skipped; every token keeps its byte span so the parser can
//! slice the original text and report offsets.

use copa_ir::type_text::{is_ident_continue, is_ident_start};
use copa_ir::Span;

use crate::ReferenceError;

/// Token kinds of the reference grammar.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// Identifier, keyword, `@verbatim` identifier or `#ctor`-style name.
    Ident,
    Dot,
    ColonColon,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Lt,
    Gt,
    LBrace,
    RBrace,
    Tilde,
    /// Any other operator character (`+`, `=`, `?`, `*`, ...).
    Punct,
    Eof,
}

impl TokenKind {
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Dot => "`.`",
            TokenKind::ColonColon => "`::`",
            TokenKind::Comma => "`,`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Tilde => "`~`",
            TokenKind::Punct => "operator character",
            TokenKind::Eof => "end of reference",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Whitespace separates this token from the previous one.
    pub spaced: bool,
}

/// Operator characters that may appear after `operator` or inside types.
fn is_punct(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '!' | '=' | '?'
    )
}

/// Split `source` into tokens, terminated by an `Eof` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ReferenceError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();
    let mut spaced = false;

    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() {
            spaced = true;
            continue;
        }

        let kind = match c {
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '~' => TokenKind::Tilde,
            ':' => {
                if chars.next_if(|&(_, next)| next == ':').is_none() {
                    return Err(ReferenceError::UnexpectedChar { ch: ':', offset: start });
                }
                TokenKind::ColonColon
            }
            '@' | '#' => {
                // `@class` and `#ctor`: the prefix must be glued to an identifier.
                if chars.next_if(|&(_, next)| is_ident_start(next)).is_none() {
                    return Err(ReferenceError::UnexpectedChar { ch: c, offset: start });
                }
                while chars.next_if(|&(_, next)| is_ident_continue(next)).is_some() {}
                TokenKind::Ident
            }
            c if is_ident_start(c) => {
                while chars.next_if(|&(_, next)| is_ident_continue(next)).is_some() {}
                TokenKind::Ident
            }
            c if is_punct(c) => TokenKind::Punct,
            c => return Err(ReferenceError::UnexpectedChar { ch: c, offset: start }),
        };

        let end = chars.peek().map_or(source.len(), |&(i, _)| i);
        tokens.push(Token {
            kind,
            span: span_of(start, end),
            spaced,
        });
        spaced = false;
    }

    let len = span_of(source.len(), source.len());
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: len,
        spaced,
    });
    Ok(tokens)
}

/// Byte range as a span, saturating for absurdly long input.
fn span_of(start: usize, end: usize) -> Span {
    Span::try_from_range(start..end).unwrap_or(Span::new(u32::MAX, u32::MAX))
}
