//! Pattern rewriting of copied content.
//!
//! Pattern attributes on the declaration that carries a copy directive are
//! validated into a [`PatternSet`] and applied as a fold: each pattern runs
//! once, in ascending `order`, over the output of the previous one.
//!
//! ```text
//! [(A, B, 0), (B, C, 1)] applied to "A" yields "C"
//! ```

mod pattern;
mod rewrite;

pub use pattern::{Pattern, PatternSet, PatternSource};
pub use rewrite::rewrite;
