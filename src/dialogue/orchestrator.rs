// Dialogue orchestrator
//
// Sequences the alignment phase and the refinement loop, owns the session
// state, and is the single failure boundary: any uncaught phase failure,
// cancellation included, is converted into a structured result with
// `phase == error` and whatever partial draft existed.

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use super::alignment::AlignmentPhase;
use super::refinement::RefinementLoop;
use super::types::{report, DialogueResult, DialogueState, Phase, ProgressCallback};
use crate::article::Article;
use crate::chat::{ChatError, ChatService, HttpChatClient};
use crate::config::Settings;
use crate::notes::{parse, AtomicNote};

pub struct DialogueOrchestrator {
    chat: Arc<dyn ChatService>,
    settings: Settings,
}

impl DialogueOrchestrator {
    pub fn new(chat: Arc<dyn ChatService>, settings: Settings) -> Self {
        Self { chat, settings }
    }

    /// Build an orchestrator backed by the HTTP client the settings
    /// describe.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let client = HttpChatClient::from_settings(&settings)?;
        Ok(Self::new(Arc::new(client), settings))
    }

    /// Run a full session for one article. Never fails: any error is
    /// recorded in the returned state instead of propagating.
    pub async fn process(
        &self,
        article: Article,
        progress: Option<&ProgressCallback<'_>>,
        cancel: CancellationToken,
    ) -> DialogueResult {
        let mut state = DialogueState::default();
        let mut notes: Vec<AtomicNote> = Vec::new();

        match self
            .run_phases(&article, &mut state, &mut notes, progress, &cancel)
            .await
        {
            Ok(()) => {
                state.phase = Phase::Complete;
                report(
                    progress,
                    Phase::Complete,
                    None,
                    None,
                    format!("session complete, {} notes", notes.len()),
                );
            }
            Err(e) => {
                let message = if is_cancellation(&e) {
                    "session cancelled".to_string()
                } else {
                    format!("{e:#}")
                };
                tracing::warn!("session ended in error: {message}");

                state.phase = Phase::Error;
                state.last_error = Some(message.clone());

                // Best-effort: surface whatever draft existed at failure.
                if notes.is_empty() {
                    if let Some(draft) = &state.current_draft {
                        notes = parse(draft).notes;
                    }
                }

                report(progress, Phase::Error, None, None, message);
            }
        }

        DialogueResult {
            article,
            state,
            notes,
            total_api_calls: self.chat.call_count(),
        }
    }

    async fn run_phases(
        &self,
        article: &Article,
        state: &mut DialogueState,
        notes: &mut Vec<AtomicNote>,
        progress: Option<&ProgressCallback<'_>>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        state.phase = Phase::Interpreting;
        let alignment = AlignmentPhase::new(self.chat.clone(), self.settings.alignment.clone())
            .run(article, state, cancel, progress)
            .await?;

        state.phase = Phase::Aligned;
        state.aligned_interpretation = Some(alignment.interpretation.clone());
        report(
            progress,
            Phase::Aligned,
            Some(alignment.rounds_used),
            Some(self.settings.alignment.max_rounds),
            if alignment.aligned {
                "interpretations aligned"
            } else {
                "interpretations synthesized without full alignment"
            },
        );

        state.phase = Phase::Drafting;
        let refinement = RefinementLoop::new(self.chat.clone(), self.settings.refinement.clone())
            .run(article, &alignment.interpretation, state, cancel, progress)
            .await?;

        state.current_draft = Some(refinement.raw_draft.clone());
        *notes = refinement.notes;

        tracing::info!(
            rounds = refinement.rounds_used,
            approved = refinement.approved,
            notes = notes.len(),
            dropped = refinement.dropped_segments,
            "refinement finished"
        );

        Ok(())
    }

    /// Running count of successful API calls for this client.
    pub fn api_calls(&self) -> u64 {
        self.chat.call_count()
    }

    /// Reset per-client counters for reuse across multiple articles
    /// without reconstructing the client.
    pub fn reset(&self) {
        self.chat.reset_call_count();
    }
}

/// A cancellation signal must not be reported as a service failure.
fn is_cancellation(e: &anyhow::Error) -> bool {
    matches!(e.downcast_ref::<ChatError>(), Some(ChatError::Cancelled))
}
