//! Text clean-up applied to every extracted body

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::constants::TRUNCATION_MARKER;
use crate::utils::string_utils::{char_len, safe_truncate_chars};

/// Three or more line breaks, LF or CRLF
static BLANK_LINE_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\r?\n){3,}").expect("BLANK_LINE_RUNS: hardcoded regex is valid")
});

/// Undo the string encoding some drivers apply to evaluated results
///
/// A single layer of enclosing double quotes is stripped, then escaped
/// newlines and escaped quotes are turned back into literal characters.
#[must_use]
pub fn clean_evaluated_text(raw: &str) -> String {
    let mut text = raw;
    if text.len() > 2 && text.starts_with('"') && text.ends_with('"') {
        text = &text[1..text.len() - 1];
    }
    text.replace("\\n", "\n").replace("\\\"", "\"")
}

/// Trim, collapse runs of three or more newlines to exactly two, and cap
/// the result at `max_chars` characters plus the truncation marker
#[must_use]
pub fn normalize_content(text: &str, max_chars: usize) -> String {
    let collapsed = BLANK_LINE_RUNS.replace_all(text.trim(), "\n\n");
    if char_len(&collapsed) > max_chars {
        let mut truncated = safe_truncate_chars(&collapsed, max_chars).to_string();
        truncated.push_str(TRUNCATION_MARKER);
        truncated
    } else {
        collapsed.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_strips_one_layer_of_quotes() {
        assert_eq!(clean_evaluated_text("\"hello\\nworld\""), "hello\nworld");
        assert_eq!(clean_evaluated_text("\"\"nested\"\""), "\"nested\"");
        assert_eq!(clean_evaluated_text("say \\\"hi\\\""), "say \"hi\"");
    }

    #[test]
    fn test_clean_leaves_short_quoted_strings() {
        assert_eq!(clean_evaluated_text("\"\""), "\"\"");
        assert_eq!(clean_evaluated_text("\""), "\"");
    }

    #[test]
    fn test_normalize_collapses_blank_lines() {
        let text = "  first\n\n\n\n\nsecond\n\nthird\n\n\n  ";
        assert_eq!(normalize_content(text, 5000), "first\n\nsecond\n\nthird");
    }

    #[test]
    fn test_normalize_collapses_crlf_runs() {
        assert_eq!(normalize_content("a\r\n\r\n\r\n\r\nb", 5000), "a\n\nb");
        assert_eq!(normalize_content("a\r\n\r\nb", 5000), "a\r\n\r\nb");
    }

    #[test]
    fn test_normalize_truncates_on_char_boundary() {
        let text = "腾讯".repeat(10);
        let out = normalize_content(&text, 5);
        assert_eq!(out, "腾讯腾讯腾...");
    }

    #[test]
    fn test_normalize_keeps_text_at_exact_limit() {
        let text = "a".repeat(5000);
        assert_eq!(normalize_content(&text, 5000), text);
    }

    proptest! {
        #[test]
        fn prop_normalized_length_is_capped(text in "\\PC{0,400}", max in 1usize..200) {
            let out = normalize_content(&text, max);
            prop_assert!(char_len(&out) <= max + char_len(TRUNCATION_MARKER));
        }

        #[test]
        fn prop_no_triple_newlines_below_cap(text in "[a-z\\r\\n ]{0,300}") {
            let out = normalize_content(&text, 10_000);
            prop_assert!(!out.contains("\n\n\n"));
            prop_assert!(!out.contains("\r\n\r\n\r\n"));
            prop_assert_eq!(out.trim(), out.as_str());
        }
    }
}
