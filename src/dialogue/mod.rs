// Two-phase dialogue protocol
//
// Phase one aligns the two roles on an interpretation of the article;
// phase two refines a note draft until the critic accepts it or the round
// budget runs out. The orchestrator sequences both and absorbs failures.

pub mod alignment;
mod orchestrator;
pub mod prompts;
pub mod refinement;
pub mod signals;
mod types;

pub use alignment::AlignmentPhase;
pub use orchestrator::DialogueOrchestrator;
pub use refinement::RefinementLoop;
pub use signals::CritiqueSignal;
pub use types::{
    AlignmentOutcome, DialogueResult, DialogueState, ExchangeKind, Phase, ProgressCallback,
    ProgressUpdate, RefinementOutcome, TranscriptEntry,
};
