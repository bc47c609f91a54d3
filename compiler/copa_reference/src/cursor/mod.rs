//! Token cursor for navigating the reference token stream.
//!
//! Provides lookahead, consumption and keyword checks. The last token is
//! always `Eof`, so `current()` never runs off the end.

use crate::lexer::{Token, TokenKind};
use crate::ReferenceError;

pub struct Cursor<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// `tokens` must end with an `Eof` token.
    pub fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|t| t.kind == TokenKind::Eof),
            "token list must be Eof-terminated"
        );
        Cursor {
            source,
            tokens,
            pos: 0,
        }
    }

    #[inline]
    pub fn current(&self) -> Token {
        self.peek(0)
    }

    /// Token `n` positions ahead, clamped to `Eof`.
    pub fn peek(&self, n: usize) -> Token {
        let last = self.tokens.len().saturating_sub(1);
        self.tokens[(self.pos + n).min(last)]
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub fn at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Byte offset of the current token.
    pub fn offset(&self) -> usize {
        self.current().span.start as usize
    }

    /// Source text of a token.
    pub fn text(&self, token: Token) -> &'a str {
        let start = token.span.start as usize;
        let end = token.span.end as usize;
        self.source.get(start..end).unwrap_or("")
    }

    /// Source text from `offset` to the end of the input.
    pub fn rest(&self, offset: usize) -> &'a str {
        self.source.get(offset..).unwrap_or("")
    }

    /// Whether the token `n` ahead is the identifier `keyword`.
    pub fn is_keyword_at(&self, n: usize, keyword: &str) -> bool {
        let token = self.peek(n);
        token.kind == TokenKind::Ident && self.text(token) == keyword
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.is_keyword_at(0, keyword)
    }

    pub fn advance(&mut self) -> Token {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ReferenceError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.expected(kind.describe()))
        }
    }

    /// An `Expected` error at the current token.
    pub fn expected(&self, expected: &'static str) -> ReferenceError {
        ReferenceError::Expected {
            expected,
            found: self.kind().describe(),
            offset: self.offset(),
        }
    }
}

#[cfg(test)]
mod tests;
