// Advisory note validation
//
// Applies configurable quality thresholds to a parsed note. Violations are
// surfaced to the human reviewer as distinct issue strings; they never block
// the refinement loop.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::parser::AtomicNote;

static LINK_TARGET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]+\]\(([^)]+)\)").expect("link target regex is valid"));

/// Quality thresholds. All advisory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteRules {
    pub min_heading_chars: usize,
    pub max_heading_chars: usize,
    pub min_body_chars: usize,
    pub max_body_chars: usize,
    /// Paragraph ceiling, counted on the raw segment (blank-line separated).
    pub max_paragraphs: usize,
    /// Require at least one link whose target is on the source's domain.
    pub require_source_link: bool,
}

impl Default for NoteRules {
    fn default() -> Self {
        Self {
            min_heading_chars: 8,
            max_heading_chars: 100,
            min_body_chars: 80,
            max_body_chars: 1200,
            max_paragraphs: 3,
            require_source_link: true,
        }
    }
}

/// Outcome of validating one note.
#[derive(Debug, Clone)]
pub struct Validation {
    pub valid: bool,
    pub issues: Vec<String>,
}

/// Check `note` against `rules`, returning every violated rule as a
/// distinct issue. `valid` is true iff no issues.
pub fn validate(note: &AtomicNote, source_url: &str, rules: &NoteRules) -> Validation {
    let mut issues = Vec::new();

    let heading_len = note.heading.chars().count();
    if heading_len < rules.min_heading_chars {
        issues.push(format!(
            "heading is too short ({heading_len} chars, minimum {})",
            rules.min_heading_chars
        ));
    }
    if heading_len > rules.max_heading_chars {
        issues.push(format!(
            "heading is too long ({heading_len} chars, maximum {})",
            rules.max_heading_chars
        ));
    }

    let body_len = note.content.chars().count();
    if body_len < rules.min_body_chars {
        issues.push(format!(
            "body is too short ({body_len} chars, minimum {})",
            rules.min_body_chars
        ));
    }
    if body_len > rules.max_body_chars {
        issues.push(format!(
            "body is too long ({body_len} chars, maximum {})",
            rules.max_body_chars
        ));
    }

    let paragraphs = paragraph_count(&note.raw);
    if paragraphs > rules.max_paragraphs {
        issues.push(format!(
            "too many paragraphs ({paragraphs}, maximum {})",
            rules.max_paragraphs
        ));
    }

    if rules.require_source_link {
        if !note.has_link {
            issues.push("no link back to the source".to_string());
        } else if !links_to_host(&note.content, source_url) {
            issues.push(format!(
                "no link targets the source domain ({})",
                host_of(source_url)
            ));
        }
    }

    Validation {
        valid: issues.is_empty(),
        issues,
    }
}

/// Blank-line separated blocks in the raw segment, heading line excluded.
fn paragraph_count(raw: &str) -> usize {
    let body = match raw.split_once('\n') {
        Some((_heading, rest)) => rest,
        None => return 0,
    };
    body.split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .count()
}

fn links_to_host(content: &str, source_url: &str) -> bool {
    let host = host_of(source_url);
    if host.is_empty() {
        return false;
    }
    LINK_TARGET_RE
        .captures_iter(content)
        .any(|caps| host_of(&caps[1]) == host)
}

fn host_of(url: &str) -> &str {
    let rest = url.split("://").nth(1).unwrap_or(url);
    let host = rest.split('/').next().unwrap_or(rest);
    host.trim_start_matches("www.")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "https://example.com/essays/attention";

    fn note(heading: &str, content: &str) -> AtomicNote {
        AtomicNote {
            heading: heading.to_string(),
            content: content.to_string(),
            has_link: content.contains("]("),
            raw: format!("## {heading}\n\n{content}"),
        }
    }

    fn good_body() -> String {
        "Attention is a finite budget that compounds when protected. \
         The essay's central move is treating focus as capital \
         ([source](https://example.com/essays/attention))."
            .to_string()
    }

    #[test]
    fn test_valid_note() {
        let n = note("Attention compounds like capital", &good_body());
        let v = validate(&n, SOURCE, &NoteRules::default());
        assert!(v.valid, "unexpected issues: {:?}", v.issues);
    }

    #[test]
    fn test_short_heading() {
        let n = note("Tiny", &good_body());
        let v = validate(&n, SOURCE, &NoteRules::default());
        assert!(!v.valid);
        assert!(v.issues.iter().any(|i| i.contains("heading is too short")));
    }

    #[test]
    fn test_short_body() {
        let n = note("A heading of reasonable length", "Too short.");
        let v = validate(&n, SOURCE, &NoteRules::default());
        assert!(v.issues.iter().any(|i| i.contains("body is too short")));
    }

    #[test]
    fn test_missing_link() {
        let n = note(
            "A heading of reasonable length",
            &"A body without any markdown link at all, padded out to pass the length rule. "
                .repeat(2),
        );
        let v = validate(&n, SOURCE, &NoteRules::default());
        assert!(v.issues.iter().any(|i| i.contains("no link back")));
    }

    #[test]
    fn test_link_to_wrong_domain() {
        let body = "A body that links elsewhere instead of the source, padded to meet length \
             ([elsewhere](https://other.org/page)).";
        let n = note("A heading of reasonable length", body);
        let v = validate(&n, SOURCE, &NoteRules::default());
        assert!(v.issues.iter().any(|i| i.contains("source domain")));
    }

    #[test]
    fn test_www_prefix_ignored() {
        let body = "A body long enough to satisfy the minimum body threshold for validation \
             ([src](https://www.example.com/essays/attention)).";
        let n = note("A heading of reasonable length", body);
        let v = validate(&n, SOURCE, &NoteRules::default());
        assert!(v.valid, "unexpected issues: {:?}", v.issues);
    }

    #[test]
    fn test_too_many_paragraphs() {
        let raw = "## A heading of reasonable length\n\nOne.\n\nTwo.\n\nThree.\n\nFour.".to_string();
        let n = AtomicNote {
            heading: "A heading of reasonable length".to_string(),
            content: good_body(),
            has_link: true,
            raw,
        };
        let v = validate(&n, SOURCE, &NoteRules::default());
        assert!(v.issues.iter().any(|i| i.contains("too many paragraphs")));
    }

    #[test]
    fn test_every_violation_is_distinct() {
        let n = note("Bad", "x");
        let v = validate(&n, SOURCE, &NoteRules::default());
        // short heading, short body, no link
        assert_eq!(v.issues.len(), 3);
    }

    #[test]
    fn test_validation_can_be_relaxed() {
        let rules = NoteRules {
            require_source_link: false,
            min_body_chars: 1,
            min_heading_chars: 1,
            ..NoteRules::default()
        };
        let n = note("T", "Body.");
        assert!(validate(&n, SOURCE, &rules).valid);
    }
}
