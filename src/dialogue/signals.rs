// Response classification
//
// Turns free-text model output into protocol signals. Classification is a
// strict prefix match on trimmed, case-normalized text: a keyword appearing
// mid-response (a model merely discussing alignment) must never trip the
// state machine. Ambiguity always defaults to the conservative signal.

/// Keywords that declare interpretation alignment. Prefix-matched only.
pub const ALIGNMENT_KEYWORDS: [&str; 4] =
    ["ALIGNED", "AGREED", "CONSENSUS REACHED", "WE ARE ALIGNED"];

/// Keywords that approve a draft outright.
pub const APPROVAL_KEYWORDS: [&str; 2] = ["APPROVED", "LGTM"];

/// Keywords that judge remaining gains marginal. Accepted as-is; the loop
/// never polishes past a marginal verdict.
pub const MARGINAL_KEYWORDS: [&str; 2] = ["MARGINAL", "BORDERLINE"];

/// Classification of a critic response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CritiqueSignal {
    Approved,
    Marginal,
    /// Anything not clearly approving — including ambiguous text. Never
    /// defaults to approval.
    NeedsWork,
}

fn normalized(text: &str) -> String {
    text.trim().to_ascii_uppercase()
}

/// Whether `text` declares alignment.
pub fn is_aligned(text: &str) -> bool {
    let n = normalized(text);
    ALIGNMENT_KEYWORDS.iter().any(|k| n.starts_with(k))
}

/// If `text` declares alignment, extract the remainder after the keyword
/// (stripped of leading punctuation and whitespace) as the shared summary.
/// Returns `None` for non-aligned responses. The summary may be empty; the
/// caller decides whether it is long enough to be meaningful.
pub fn alignment_summary(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let upper = trimmed.to_ascii_uppercase();

    let keyword = ALIGNMENT_KEYWORDS
        .iter()
        .find(|k| upper.starts_with(*k))?;

    // ASCII uppercasing preserves byte offsets, so the keyword length maps
    // straight back into the original text.
    let remainder = trimmed[keyword.len()..]
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ':' | ';' | '!' | '-' | '—' | '–'));

    Some(remainder.trim().to_string())
}

/// Classify a critic response. Strict prefix match; free text is NeedsWork.
pub fn classify_critique(text: &str) -> CritiqueSignal {
    let n = normalized(text);
    if APPROVAL_KEYWORDS.iter().any(|k| n.starts_with(k)) {
        CritiqueSignal::Approved
    } else if MARGINAL_KEYWORDS.iter().any(|k| n.starts_with(k)) {
        CritiqueSignal::Marginal
    } else {
        CritiqueSignal::NeedsWork
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_prefix_matches() {
        assert!(is_aligned("ALIGNED. We agree."));
        assert!(is_aligned("  aligned: the article argues X"));
        assert!(is_aligned("Agreed — both readings converge."));
        assert!(is_aligned("CONSENSUS REACHED on the main claim"));
    }

    #[test]
    fn test_aligned_mid_text_does_not_match() {
        assert!(!is_aligned("We are not yet aligned on the thesis."));
        assert!(!is_aligned("I think being aligned matters, but I disagree."));
        assert!(!is_aligned("The author discusses alignment of incentives."));
    }

    #[test]
    fn test_aligned_empty_and_noise() {
        assert!(!is_aligned(""));
        assert!(!is_aligned("   "));
        assert!(!is_aligned("ALIGNMENT is a topic"));
        // "ALIGNMENT" does not start with "ALIGNED" — the D differs
    }

    #[test]
    fn test_summary_extraction() {
        let summary = alignment_summary("ALIGNED. We agree the article argues X.").unwrap();
        assert_eq!(summary, "We agree the article argues X.");
    }

    #[test]
    fn test_summary_strips_leading_punctuation() {
        let summary = alignment_summary("aligned: — the shared reading").unwrap();
        assert_eq!(summary, "the shared reading");
    }

    #[test]
    fn test_summary_empty_for_bare_keyword() {
        assert_eq!(alignment_summary("ALIGNED.").unwrap(), "");
        assert_eq!(alignment_summary("ALIGNED").unwrap(), "");
    }

    #[test]
    fn test_summary_none_when_not_aligned() {
        assert!(alignment_summary("I propose a refined interpretation.").is_none());
    }

    #[test]
    fn test_summary_preserves_case_of_remainder() {
        let summary = alignment_summary("Agreed, The Key Insight Is Focus.").unwrap();
        assert_eq!(summary, "The Key Insight Is Focus.");
    }

    #[test]
    fn test_critique_approved() {
        assert_eq!(classify_critique("APPROVED"), CritiqueSignal::Approved);
        assert_eq!(
            classify_critique("  approved — ship it"),
            CritiqueSignal::Approved
        );
        assert_eq!(classify_critique("LGTM, nice work"), CritiqueSignal::Approved);
    }

    #[test]
    fn test_critique_marginal() {
        assert_eq!(
            classify_critique("MARGINAL. Remaining gains are small."),
            CritiqueSignal::Marginal
        );
        assert_eq!(classify_critique("borderline"), CritiqueSignal::Marginal);
    }

    #[test]
    fn test_critique_free_text_is_needs_work() {
        assert_eq!(
            classify_critique("The second note is not self-contained; it references 'this'."),
            CritiqueSignal::NeedsWork
        );
    }

    #[test]
    fn test_critique_keyword_mid_text_is_needs_work() {
        assert_eq!(
            classify_critique("This would be approved if the headings were sharper."),
            CritiqueSignal::NeedsWork
        );
    }

    #[test]
    fn test_critique_empty_is_needs_work() {
        assert_eq!(classify_critique(""), CritiqueSignal::NeedsWork);
    }
}
