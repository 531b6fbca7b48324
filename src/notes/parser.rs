// Note structure parser
//
// Splits raw model output into discrete heading+body note units. Malformed
// segments (empty heading or empty body) are silently dropped rather than
// failing the whole response; the drop count is carried for diagnostics.

use once_cell::sync::Lazy;
use regex::Regex;

/// Heading marker for one note. Level-3 and deeper headings stay inside a
/// note's body.
const HEADING_MARKER: &str = "## ";

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]+\]\([^)]+\)").expect("link regex is valid"));

/// One self-contained insight note extracted from model output.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicNote {
    /// Heading text with the marker stripped and trimmed.
    pub heading: String,
    /// Body: the segment's non-blank lines, joined and trimmed.
    pub content: String,
    /// Whether the body embeds a markdown-style `[text](url)` link.
    /// Derived, never set independently.
    pub has_link: bool,
    /// The exact heading+body slice, preserved for verbatim persistence.
    pub raw: String,
}

/// Result of parsing one model response.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub notes: Vec<AtomicNote>,
    /// Segments discarded for an empty heading or empty body.
    pub dropped: usize,
}

/// Split `raw` on level-2 heading boundaries into notes, discarding any
/// leading text before the first heading.
pub fn parse(raw: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    let mut segments: Vec<Vec<&str>> = Vec::new();
    for line in raw.lines() {
        if line.starts_with(HEADING_MARKER) {
            segments.push(vec![line]);
        } else if let Some(current) = segments.last_mut() {
            current.push(line);
        }
        // Preamble before the first heading is discarded.
    }

    for lines in segments {
        let heading = lines[0]
            .trim_start_matches(HEADING_MARKER)
            .trim()
            .to_string();

        let content = lines[1..]
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();

        if heading.is_empty() || content.is_empty() {
            outcome.dropped += 1;
            continue;
        }

        let has_link = LINK_RE.is_match(&content);
        let raw_slice = lines.join("\n").trim_end().to_string();

        outcome.notes.push(AtomicNote {
            heading,
            content,
            has_link,
            raw: raw_slice,
        });
    }

    if outcome.dropped > 0 {
        tracing::warn!(dropped = outcome.dropped, "dropped unusable note segments");
    }

    outcome
}
