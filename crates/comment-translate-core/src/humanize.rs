//! Identifier humanization and re-casing.

use heck::{ToLowerCamelCase, ToSnakeCase};

/// Splits an identifier into lower-case words separated by single spaces.
///
/// `fooBarBaz`, `foo_bar_baz` and `FOO-BAR-BAZ` all become `foo bar baz`.
pub fn humanize(identifier: &str) -> String {
    identifier.to_snake_case().replace('_', " ")
}

/// Re-cases translated words as a lower camel case identifier.
///
/// `get user name` becomes `getUserName`.
pub fn to_identifier(words: &str) -> String {
    words.to_lower_camel_case()
}
