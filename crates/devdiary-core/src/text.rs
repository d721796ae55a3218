//! Small text helpers used when presenting posts.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a page description, in characters.
pub const DESCRIPTION_LEN: usize = 160;

/// Avatar initials: first two letters of a single name, otherwise the first
/// letter of each of the first two words.
pub fn initials(name: &str) -> String {
    let mut words = name.split_whitespace();

    match (words.next(), words.next()) {
        (None, _) => String::new(),
        (Some(only), None) => only.chars().take(2).collect::<String>().to_uppercase(),
        (Some(first), Some(second)) => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .collect::<String>()
            .to_uppercase(),
    }
}

/// An opening or closing tag. An unterminated tag runs to the end of input.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[^>]+(>|$)").expect("tag pattern is valid"));

/// Remove markup tags, keeping the text between them.
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

/// Plain-text summary of HTML content, capped at [`DESCRIPTION_LEN`] characters.
pub fn description(html: &str) -> String {
    strip_tags(html).trim().chars().take(DESCRIPTION_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(initials("Ali Khan"), "AK");
        assert_eq!(initials("  sara   malik  "), "SM");
        assert_eq!(initials("Waqas Ahmad Butt"), "WA");
        assert_eq!(initials("user"), "US");
        assert_eq!(initials("J"), "J");
        assert_eq!(initials("   "), "");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("a <> b"), "a <> b");
        assert_eq!(strip_tags("text <unterminated"), "text ");
        assert_eq!(strip_tags("no markup"), "no markup");
        assert_eq!(strip_tags("<a\nhref=\"x\">link</a>"), "link");
    }

    #[test]
    fn test_description_is_capped() {
        let html = format!("<p>{}</p>", "x".repeat(400));
        let text = description(&html);
        assert_eq!(text.chars().count(), DESCRIPTION_LEN);
        assert!(text.chars().all(|c| c == 'x'));
    }
}
