//! UTF-8-safe string truncation utilities
//!
//! Scraped content is frequently CJK text, so every cap in this crate is
//! measured in characters and cut on a character boundary.

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// # Examples
/// ```
/// # use kodegen_tools_stocknews::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("腾讯控股新闻", 2), "腾讯");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
#[must_use]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Number of characters in `s`
#[inline]
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_multibyte_boundaries() {
        let text = "雪球股票🎉行情";
        assert_eq!(safe_truncate_chars(text, 5), "雪球股票🎉");
        assert_eq!(char_len(safe_truncate_chars(text, 5)), 5);
    }

    #[test]
    fn test_truncate_zero() {
        assert_eq!(safe_truncate_chars("abc", 0), "");
    }
}
