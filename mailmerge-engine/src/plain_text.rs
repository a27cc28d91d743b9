//! Plain-text derivation of rich output
//!
//! Tags are replaced by a space, then every whitespace run collapses to a
//! single space and the result is trimmed. Character references are left as
//! they are; the transform is one way.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Strips markup from rich output and normalizes its whitespace
pub fn to_plain_text(rich: &str) -> String {
    let stripped = TAG.replace_all(rich, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_markup() {
        assert_eq!(
            to_plain_text("Hi Alice, Thanks for being a premium user!"),
            "Hi Alice, Thanks for being a premium user!"
        );
    }

    #[test]
    fn strips_tags() {
        assert_eq!(
            to_plain_text("<p>Hello <b>Bob</b></p><ul><li>one</li><li>two</li></ul>"),
            "Hello Bob one two"
        );
        assert_eq!(to_plain_text("line<br />break"), "line break");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(to_plain_text("  a \n\n\t b  "), "a b");
        assert_eq!(to_plain_text(" <div>\n  x\n</div> "), "x");
        assert_eq!(to_plain_text(""), "");
    }

    #[test]
    fn keeps_stray_brackets_and_entities() {
        assert_eq!(to_plain_text("1 < 2 &amp; 3"), "1 < 2 &amp; 3");
    }
}
