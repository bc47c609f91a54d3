//! Recursive descent parser for member references.
//!
//! Grammar, left to right:
//!
//! ```text
//! reference  := qualifier? body
//! qualifier  := "global" "::" | IDENT "::" | "this" "." | "base" "."
//! body       := (segment ".")* ( segment params?
//!                              | "operator" OP params?
//!                              | ("explicit" | "implicit") "operator" type params?
//!                              | "this" "[" plist "]" ("_get" | "_set")?
//!                              | "#ctor" params?
//!                              | "~" IDENT ("(" ")")? )
//! segment    := IDENT (("<" | "{") generic-args (">" | "}"))?
//! params     := "(" plist ")"
//! plist      := (param ("," param)*)? ("," "__arglist")?
//! param      := ("ref" | "in" | "out" | "params")? type
//! ```
//!
//! A trailing `_get`/`_set`/`_add`/`_remove` on the last path segment selects
//! an accessor; `Type.Type(..)` names a constructor.

use copa_ir::type_text::is_ident_continue;
use copa_ir::{AccessorKind, OperatorKind, RefKind};
use tracing::trace;

use crate::ast::{
    GenericArgs, MemberReference, NameSegment, ParamList, ParamSpec, Path, Qualifier,
    ReferenceKind,
};
use crate::cursor::Cursor;
use crate::lexer::{tokenize, TokenKind};
use crate::ReferenceError;

/// Parse a reference string.
///
/// Total over its input: every string yields a reference or a typed error.
pub fn parse_reference(source: &str) -> Result<MemberReference, ReferenceError> {
    if source.trim().is_empty() {
        return Err(ReferenceError::Empty);
    }
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        cursor: Cursor::new(source, tokens),
    };
    let reference = parser.parse()?;
    trace!(source, parsed = %reference, "parsed reference");
    Ok(reference)
}

struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl Parser<'_> {
    fn parse(&mut self) -> Result<MemberReference, ReferenceError> {
        let qualifier = self.parse_qualifier();
        let kind = self.parse_body()?;
        if !self.cursor.at_end() {
            let offset = self.cursor.offset();
            return Err(ReferenceError::Trailing {
                text: self.cursor.rest(offset).trim_end().to_string(),
                offset,
            });
        }
        Ok(MemberReference { qualifier, kind })
    }

    fn parse_qualifier(&mut self) -> Qualifier {
        let c = &self.cursor;
        let first = c.current();
        if first.kind != TokenKind::Ident {
            return Qualifier::None;
        }
        let text = c.text(first);
        let qualifier = match (text, c.peek(1).kind) {
            ("global", TokenKind::ColonColon) => Qualifier::Global,
            (_, TokenKind::ColonColon) => Qualifier::Alias(identifier(text).to_string()),
            ("this", TokenKind::Dot) => Qualifier::This,
            ("base", TokenKind::Dot) => Qualifier::Base,
            _ => return Qualifier::None,
        };
        self.cursor.advance();
        self.cursor.advance();
        qualifier
    }

    fn parse_body(&mut self) -> Result<ReferenceKind, ReferenceError> {
        let mut path = Path::new();
        loop {
            match self.cursor.kind() {
                TokenKind::Tilde => return self.parse_destructor(path),
                TokenKind::Ident => {}
                _ => return Err(self.cursor.expected("identifier")),
            }

            if self.cursor.is_keyword("this") && self.cursor.peek(1).kind == TokenKind::LBracket {
                return self.parse_indexer(path);
            }
            if self.cursor.is_keyword("operator") {
                self.cursor.advance();
                return self.parse_operator(path);
            }
            if (self.cursor.is_keyword("explicit") || self.cursor.is_keyword("implicit"))
                && self.cursor.is_keyword_at(1, "operator")
            {
                return self.parse_conversion(path);
            }
            if self.cursor.is_keyword("#ctor") {
                self.cursor.advance();
                let params = self.parse_optional_params()?;
                return Ok(ReferenceKind::Constructor {
                    container: path,
                    params,
                });
            }

            path.push(self.parse_segment()?);
            if !self.cursor.eat(TokenKind::Dot) {
                break;
            }
        }

        let params = self.parse_optional_params()?;
        Ok(finish_path(path, params))
    }

    fn parse_segment(&mut self) -> Result<NameSegment, ReferenceError> {
        let token = self.cursor.expect(TokenKind::Ident)?;
        let name = identifier(self.cursor.text(token)).to_string();
        let generics = match self.cursor.kind() {
            TokenKind::Lt => self.parse_generic_args(TokenKind::Gt, '<')?,
            TokenKind::LBrace => self.parse_generic_args(TokenKind::RBrace, '{')?,
            _ => GenericArgs::None,
        };
        Ok(NameSegment { name, generics })
    }

    /// `<...>` or cref-style `{...}`; the opening token is current.
    fn parse_generic_args(
        &mut self,
        close: TokenKind,
        open_char: char,
    ) -> Result<GenericArgs, ReferenceError> {
        let open_offset = self.cursor.offset();
        self.cursor.advance();

        if self.cursor.eat(close) {
            return Ok(GenericArgs::Unbound(1));
        }
        if self.cursor.check(TokenKind::Comma) {
            let mut arity = 1;
            while self.cursor.eat(TokenKind::Comma) {
                arity += 1;
            }
            self.expect_close(close, open_char, open_offset)?;
            return Ok(GenericArgs::Unbound(arity));
        }

        let mut args = Vec::new();
        loop {
            args.push(self.parse_type(&[TokenKind::Comma, close])?);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_close(close, open_char, open_offset)?;
        Ok(GenericArgs::Bound(args))
    }

    fn expect_close(
        &mut self,
        close: TokenKind,
        open: char,
        offset: usize,
    ) -> Result<(), ReferenceError> {
        if self.cursor.eat(close) {
            Ok(())
        } else if self.cursor.at_end() {
            Err(ReferenceError::Unclosed { open, offset })
        } else {
            Err(self.cursor.expected(close.describe()))
        }
    }

    fn parse_optional_params(&mut self) -> Result<Option<ParamList>, ReferenceError> {
        if self.cursor.check(TokenKind::LParen) {
            self.parse_param_list(TokenKind::RParen, '(').map(Some)
        } else {
            Ok(None)
        }
    }

    /// Parameter list between `(`/`)` or `[`/`]`; the opening token is current.
    fn parse_param_list(
        &mut self,
        close: TokenKind,
        open_char: char,
    ) -> Result<ParamList, ReferenceError> {
        let open_offset = self.cursor.offset();
        self.cursor.advance();
        let mut list = ParamList::default();
        if self.cursor.eat(close) {
            return Ok(list);
        }

        loop {
            if self.cursor.is_keyword("__arglist") {
                self.cursor.advance();
                list.arglist = true;
                break;
            }

            let mut ref_kind = RefKind::None;
            let token = self.cursor.current();
            if token.kind == TokenKind::Ident {
                if let Some(kind) = RefKind::from_keyword(self.cursor.text(token)) {
                    self.cursor.advance();
                    ref_kind = kind;
                }
            }

            let ty = self.parse_type(&[TokenKind::Comma, close])?;
            list.params.push(ParamSpec { ref_kind, ty });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }

        self.expect_close(close, open_char, open_offset)?;
        Ok(list)
    }

    /// Type text up to (not including) a top-level token in `stop`.
    ///
    /// Brackets nest; cref-style braces are rewritten to angle brackets.
    fn parse_type(&mut self, stop: &[TokenKind]) -> Result<String, ReferenceError> {
        let start = self.cursor.offset();
        let mut text = String::new();
        let mut nesting: Vec<(TokenKind, char, usize)> = Vec::new();

        loop {
            let token = self.cursor.current();
            if nesting.is_empty() && stop.contains(&token.kind) {
                break;
            }
            match token.kind {
                TokenKind::Eof => {
                    if let Some(&(_, open, offset)) = nesting.last() {
                        return Err(ReferenceError::Unclosed { open, offset });
                    }
                    break;
                }
                TokenKind::Lt | TokenKind::LBrace => {
                    let (close, open) = if token.kind == TokenKind::Lt {
                        (TokenKind::Gt, '<')
                    } else {
                        (TokenKind::RBrace, '{')
                    };
                    nesting.push((close, open, self.cursor.offset()));
                    text.push('<');
                }
                TokenKind::LParen => {
                    nesting.push((TokenKind::RParen, '(', self.cursor.offset()));
                    text.push('(');
                }
                TokenKind::LBracket => {
                    nesting.push((TokenKind::RBracket, '[', self.cursor.offset()));
                    text.push('[');
                }
                TokenKind::Gt | TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    match nesting.last() {
                        Some(&(close, _, _)) if close == token.kind => {
                            nesting.pop();
                            text.push(match token.kind {
                                TokenKind::RParen => ')',
                                TokenKind::RBracket => ']',
                                _ => '>',
                            });
                        }
                        Some(&(close, _, _)) => return Err(self.cursor.expected(close.describe())),
                        None => break,
                    }
                }
                TokenKind::Comma => text.push_str(", "),
                TokenKind::ColonColon => text.push_str("::"),
                TokenKind::Dot => text.push('.'),
                TokenKind::Ident => {
                    if text.ends_with(is_ident_continue) {
                        text.push(' ');
                    }
                    text.push_str(identifier(self.cursor.text(token)));
                }
                TokenKind::Punct => text.push_str(self.cursor.text(token)),
                TokenKind::Tilde => return Err(self.cursor.expected("type")),
            }
            self.cursor.advance();
        }

        if text.is_empty() {
            return Err(ReferenceError::Expected {
                expected: "type",
                found: self.cursor.kind().describe(),
                offset: start,
            });
        }
        Ok(text)
    }

    fn parse_operator(&mut self, container: Path) -> Result<ReferenceKind, ReferenceError> {
        let offset = self.cursor.offset();
        let mut token_text = String::new();

        if self.cursor.is_keyword("true") || self.cursor.is_keyword("false") {
            let token = self.cursor.advance();
            token_text.push_str(self.cursor.text(token));
        } else {
            // Multi-character operators are written without inner whitespace.
            while matches!(
                self.cursor.kind(),
                TokenKind::Punct | TokenKind::Lt | TokenKind::Gt | TokenKind::Tilde
            ) && (token_text.is_empty() || !self.cursor.current().spaced)
            {
                let token = self.cursor.advance();
                token_text.push_str(self.cursor.text(token));
            }
        }

        if token_text.is_empty() {
            return Err(self.cursor.expected("operator token"));
        }
        let Some(op) = OperatorKind::from_token(&token_text) else {
            return Err(ReferenceError::UnknownOperator {
                token: token_text,
                offset,
            });
        };

        let params = self.parse_optional_params()?;
        Ok(ReferenceKind::Operator {
            container,
            op,
            params,
        })
    }

    fn parse_conversion(&mut self, container: Path) -> Result<ReferenceKind, ReferenceError> {
        let explicit = self.cursor.is_keyword("explicit");
        self.cursor.advance();
        self.cursor.advance();
        let target = self.parse_type(&[TokenKind::LParen])?;
        let params = self.parse_optional_params()?;
        Ok(ReferenceKind::Conversion {
            container,
            explicit,
            target,
            params,
        })
    }

    fn parse_indexer(&mut self, container: Path) -> Result<ReferenceKind, ReferenceError> {
        self.cursor.advance();
        let params = self.parse_param_list(TokenKind::RBracket, '[')?;

        let mut accessor = None;
        let next = self.cursor.current();
        if next.kind == TokenKind::Ident && !next.spaced {
            let suffix = self.cursor.text(next);
            accessor = match suffix {
                "_get" => Some(AccessorKind::Get),
                "_set" => Some(AccessorKind::Set),
                _ => return Err(self.cursor.expected("`_get` or `_set`")),
            };
            self.cursor.advance();
        }

        Ok(ReferenceKind::Indexer {
            container,
            params: Some(params),
            accessor,
        })
    }

    fn parse_destructor(&mut self, mut container: Path) -> Result<ReferenceKind, ReferenceError> {
        self.cursor.advance();
        let token = self.cursor.expect(TokenKind::Ident)?;
        let name = identifier(self.cursor.text(token));

        if self.cursor.check(TokenKind::LParen) {
            let offset = self.cursor.offset();
            let params = self.parse_param_list(TokenKind::RParen, '(')?;
            if !params.params.is_empty() || params.arglist {
                return Err(ReferenceError::Invalid {
                    what: "destructors take no parameters",
                    offset,
                });
            }
        }

        if container.last().map(|s| s.name.as_str()) != Some(name) {
            container.push(NameSegment::new(name));
        }
        Ok(ReferenceKind::Destructor { container })
    }
}

/// Classify a plain dotted path once its parameter list is known.
fn finish_path(mut segments: Path, params: Option<ParamList>) -> ReferenceKind {
    let len = segments.len();
    if len >= 2
        && segments[len - 1].generics.is_none()
        && segments[len - 1].name == segments[len - 2].name
    {
        segments.pop();
        return ReferenceKind::Constructor {
            container: segments,
            params,
        };
    }

    let mut accessor = None;
    if let Some(last) = segments.last_mut() {
        if last.generics.is_none() {
            if let Some((stem, kind)) = split_accessor(&last.name) {
                last.name = stem.to_string();
                accessor = Some(kind);
            }
        }
    }

    ReferenceKind::Path {
        segments,
        params,
        accessor,
    }
}

/// `Name_get` → (`Name`, `Get`).
fn split_accessor(name: &str) -> Option<(&str, AccessorKind)> {
    let (stem, suffix) = name.rsplit_once('_')?;
    if stem.is_empty() {
        return None;
    }
    AccessorKind::from_suffix(suffix).map(|kind| (stem, kind))
}

/// Identifier text without a verbatim `@` prefix.
fn identifier(text: &str) -> &str {
    text.strip_prefix('@').unwrap_or(text)
}
