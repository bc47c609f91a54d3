//! Reference parser for copy directives.
//!
//! Turns the textual target of a directive (`N.Type<int>.Method(ref int)`,
//! `Property_get`, `operator +(T, T)`, `this[int]`, `~Type()`, ...) into a
//! structured [`MemberReference`]. Pure grammar: no symbol knowledge and no
//! diagnostics. Anything outside the grammar is a [`ReferenceError`], which
//! the caller reports as a malformed reference.

pub mod ast;
mod cursor;
mod error;
mod lexer;
mod parser;

pub use ast::{
    GenericArgs, MemberReference, NameSegment, ParamList, ParamSpec, Path, Qualifier,
    ReferenceKind,
};
pub use error::ReferenceError;
pub use parser::parse_reference;
