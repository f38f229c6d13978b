//! SQL utility functions

/// Where the wildcard goes when a value becomes a LIKE pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeMatch {
    Prefix,
    Suffix,
    Substring,
}

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Patterns built from this are meant for `LIKE ? ESCAPE '\'`.
///
/// # Example
///
/// ```
/// use sift::utils::sql::escape_like_pattern;
///
/// assert_eq!(escape_like_pattern("100% match_test"), "100\\% match\\_test");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Build a LIKE pattern from a raw value, escaping it first
pub fn like_pattern(value: &str, kind: LikeMatch) -> String {
    let escaped = escape_like_pattern(value);
    match kind {
        LikeMatch::Prefix => format!("{}%", escaped),
        LikeMatch::Suffix => format!("%{}", escaped),
        LikeMatch::Substring => format!("%{}%", escaped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_leaves_plain_text() {
        assert_eq!(escape_like_pattern("hello"), "hello");
        assert_eq!(escape_like_pattern(""), "");
    }

    #[test]
    fn test_escape_all_metacharacters() {
        assert_eq!(escape_like_pattern("100%_\\test"), "100\\%\\_\\\\test");
    }

    #[test]
    fn test_like_pattern_wildcard_placement() {
        assert_eq!(like_pattern("Jo", LikeMatch::Prefix), "Jo%");
        assert_eq!(like_pattern("son", LikeMatch::Suffix), "%son");
        assert_eq!(like_pattern("an", LikeMatch::Substring), "%an%");
    }

    #[test]
    fn test_like_pattern_escapes_before_wrapping() {
        assert_eq!(like_pattern("50%", LikeMatch::Prefix), "50\\%%");
        assert_eq!(like_pattern("a_b", LikeMatch::Substring), "%a\\_b%");
    }
}
