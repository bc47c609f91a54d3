use std::borrow::Cow;

use crate::Pattern;

/// Apply `patterns` in slice order, each over the previous output.
///
/// A pattern that matches nothing leaves the text as it is.
pub fn rewrite(text: &str, patterns: &[Pattern]) -> String {
    let mut current = Cow::Borrowed(text);
    for pattern in patterns {
        let next = match pattern.apply(&current) {
            Cow::Borrowed(_) => continue,
            Cow::Owned(next) => next,
        };
        current = Cow::Owned(next);
    }
    current.into_owned()
}
