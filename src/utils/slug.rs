//! URL slugification.

use deunicode::deunicode;
use regex::Regex;
use std::sync::LazyLock;

/// Anything that is not a word character, whitespace or `-`.
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_ \t\n\r\x0B\x0C-]").expect("non-word regex is valid")
});

/// Runs of dashes and whitespace.
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[- \t\n\r\x0B\x0C]+").expect("separator regex is valid"));

/// Turn a title into a URL slug, the same way the site generator does.
///
/// Non-ASCII text is transliterated and punctuation deleted outright (so
/// `5.9` becomes `59` and `what's` becomes `whats`). Leading and trailing
/// whitespace is trimmed, every run of dashes and whitespace collapses into a
/// single `-`, and the result is lowercased.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let words = NON_WORD.replace_all(&ascii, "");
    SEPARATORS
        .replace_all(words.trim(), "-")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Leading and trailing  "), "leading-and-trailing");
        assert_eq!(slugify("Über Café"), "uber-cafe");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn test_slugify_deletes_punctuation_instead_of_splitting() {
        assert_eq!(slugify("Swift 5.9: what's new"), "swift-59-whats-new");
        assert_eq!(slugify("Swift 5.9 -- what's new"), "swift-59-whats-new");
        assert_eq!(slugify("C++ & Rust"), "c-rust");
    }

    #[test]
    fn test_slugify_keeps_a_lone_separator() {
        assert_eq!(slugify("---"), "-");
        assert_eq!(slugify("!!!"), "");
    }
}
