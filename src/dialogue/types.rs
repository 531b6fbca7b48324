// Session types — state, transcript, phase outcomes, progress reporting

use serde::Serialize;

use crate::article::Article;
use crate::chat::ModelRole;
use crate::notes::AtomicNote;

/// Where a session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Interpreting,
    Aligned,
    Drafting,
    Refining,
    Complete,
    Error,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Phase::Interpreting => "interpreting",
            Phase::Aligned => "aligned",
            Phase::Drafting => "drafting",
            Phase::Refining => "refining",
            Phase::Complete => "complete",
            Phase::Error => "error",
        };
        f.write_str(label)
    }
}

/// Kind of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    Draft,
    Critique,
    Revision,
}

/// One model exchange in the refinement phase. Append-only; never mutated
/// after being pushed.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub phase: Phase,
    pub role: ModelRole,
    pub kind: ExchangeKind,
    pub content: String,
    pub round: usize,
}

/// Mutable session record. Owned by the orchestrator and passed by
/// reference into each phase; there is no ambient state across sessions.
#[derive(Debug, Clone, Serialize)]
pub struct DialogueState {
    pub phase: Phase,
    pub interpretation_rounds: usize,
    pub refinement_rounds: usize,
    pub drafter_interpretation: Option<String>,
    pub critic_interpretation: Option<String>,
    pub aligned_interpretation: Option<String>,
    /// Raw text of the latest draft or revision, kept current so a
    /// mid-flight failure still leaves a best-effort draft behind.
    pub current_draft: Option<String>,
    pub last_error: Option<String>,
}

impl Default for DialogueState {
    fn default() -> Self {
        Self {
            phase: Phase::Interpreting,
            interpretation_rounds: 0,
            refinement_rounds: 0,
            drafter_interpretation: None,
            critic_interpretation: None,
            aligned_interpretation: None,
            current_draft: None,
            last_error: None,
        }
    }
}

/// Output of the interpretation alignment phase. The aligned/unaligned
/// distinction is informational; downstream behavior is identical.
#[derive(Debug, Clone)]
pub struct AlignmentOutcome {
    pub aligned: bool,
    pub interpretation: String,
    pub drafter_interpretation: String,
    pub critic_interpretation: String,
    pub rounds_used: usize,
}

/// Output of the refinement loop. `approved == false` is a soft failure:
/// the best-effort last parsed draft is still present.
#[derive(Debug, Clone)]
pub struct RefinementOutcome {
    pub notes: Vec<AtomicNote>,
    pub raw_draft: String,
    pub rounds_used: usize,
    pub approved: bool,
    pub transcript: Vec<TranscriptEntry>,
    /// Total parse segments silently dropped across all drafts.
    pub dropped_segments: usize,
}

/// Final session result. Always structured, even after a failure.
#[derive(Debug, Clone)]
pub struct DialogueResult {
    pub article: Article,
    pub state: DialogueState,
    pub notes: Vec<AtomicNote>,
    pub total_api_calls: u64,
}

/// Observational progress event, emitted synchronously at phase and round
/// transitions. The callback must never block or fail.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub phase: Phase,
    pub current_round: Option<usize>,
    pub max_rounds: Option<usize>,
    pub message: String,
}

/// Callback signature for progress reporting. The lifetime lets callers
/// hand in closures that borrow local state for the duration of a session.
pub type ProgressCallback<'a> = dyn Fn(ProgressUpdate) + Send + Sync + 'a;

/// Emit a progress update if a callback is installed.
pub(crate) fn report(
    progress: Option<&ProgressCallback<'_>>,
    phase: Phase,
    current_round: Option<usize>,
    max_rounds: Option<usize>,
    message: impl Into<String>,
) {
    if let Some(callback) = progress {
        callback(ProgressUpdate {
            phase,
            current_round,
            max_rounds,
            message: message.into(),
        });
    }
}
