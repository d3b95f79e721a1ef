use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub const DEFAULT_TITLE: &str = "video_content";

/// Cleans an extractor title for captions and audio tags.
pub fn sanitize_title(name: &str) -> String {
    let name: String = name.nfc().collect();
    let name = name.replace(['/', '\\'], "_");
    let name = WS_RE.replace_all(name.trim(), " ");

    if name.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        name.into_owned()
    }
}

/// Cuts on a character boundary, never inside a multi-byte sequence.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_path_separators() {
        assert_eq!(sanitize_title("AC/DC \\ live"), "AC_DC _ live");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(sanitize_title("  hello \n\t world  "), "hello world");
    }

    #[test]
    fn empty_title_falls_back() {
        assert_eq!(sanitize_title("   "), DEFAULT_TITLE);
    }

    #[test]
    fn nfc_normalization() {
        assert_eq!(sanitize_title("e\u{0301}"), "\u{00e9}");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("привет", 3), "при");
        assert_eq!(truncate_chars("abc", 64), "abc");
        let long = "я".repeat(100);
        assert_eq!(truncate_chars(&long, 64).chars().count(), 64);
    }
}
