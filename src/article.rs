// Article input type and content truncation

use serde::{Deserialize, Serialize};

use crate::config::constants::TRUNCATION_NOTICE;

/// The source document for a session. Produced by an external extractor
/// (readability or similar) and immutable for the duration of a session.
///
/// Field names accept the camelCase shape readability extractors emit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub content: String,
    pub url: String,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
}

/// Truncate `content` to at most `ceiling` bytes, cutting at the nearest
/// preceding word boundary and appending a truncation notice. Never splits
/// mid-word; output length is at most `ceiling + TRUNCATION_NOTICE.len()`.
pub fn truncate_at_word_boundary(content: &str, ceiling: usize) -> String {
    if content.len() <= ceiling {
        return content.to_string();
    }

    // Walk the cut back to a char boundary first, then to whitespace.
    let mut cut = ceiling;
    while cut > 0 && !content.is_char_boundary(cut) {
        cut -= 1;
    }
    let prefix = &content[..cut];
    let truncated = match prefix.rfind(char::is_whitespace) {
        Some(pos) => &prefix[..pos],
        // A single unbroken token longer than the ceiling: splitting it
        // would emit a partial word, so drop it entirely.
        None => "",
    };

    let mut out = truncated.trim_end().to_string();
    out.push_str(TRUNCATION_NOTICE);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_untouched() {
        assert_eq!(truncate_at_word_boundary("hello world", 100), "hello world");
    }

    #[test]
    fn test_exact_ceiling_untouched() {
        let content = "abcde";
        assert_eq!(truncate_at_word_boundary(content, 5), "abcde");
    }

    #[test]
    fn test_cut_lands_on_word_boundary() {
        let content = "alpha beta gamma delta epsilon";
        let out = truncate_at_word_boundary(content, 17);
        let body = out.strip_suffix(TRUNCATION_NOTICE).unwrap();
        // Never a partial word: every kept word must appear whole in the input
        assert_eq!(body, "alpha beta gamma");
        assert!(content.starts_with(body));
    }

    #[test]
    fn test_length_bound() {
        let content = "word ".repeat(1000);
        let ceiling = 57;
        let out = truncate_at_word_boundary(&content, ceiling);
        assert!(out.len() <= ceiling + TRUNCATION_NOTICE.len());
        assert!(out.ends_with(TRUNCATION_NOTICE));
    }

    #[test]
    fn test_unbroken_token_is_dropped_not_split() {
        let content = "a".repeat(100);
        let out = truncate_at_word_boundary(&content, 10);
        // No fragment of the token survives the cut
        assert_eq!(out, TRUNCATION_NOTICE);
        assert!(out.len() <= 10 + TRUNCATION_NOTICE.len());
    }

    #[test]
    fn test_multibyte_content_does_not_panic() {
        let content = "héllo wörld ünd mòre wörds hère ".repeat(20);
        let out = truncate_at_word_boundary(&content, 41);
        assert!(out.len() <= 41 + TRUNCATION_NOTICE.len());
    }

    #[test]
    fn test_article_accepts_camel_case() {
        let article: Article = serde_json::from_str(
            r#"{"title":"T","content":"C","url":"https://example.com/a","siteName":"Example"}"#,
        )
        .unwrap();
        assert_eq!(article.site_name.as_deref(), Some("Example"));
        assert!(article.excerpt.is_none());
    }
}
