// Draft-critique-revise refinement loop
//
// Consumes the aligned interpretation and produces validated notes plus a
// full transcript. The critic reviews the raw draft text, not the parsed
// notes. A needs-work verdict that lands exactly on the round budget exits
// without a further revision call, so no revision is ever generated that
// would never be reviewed.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use super::prompts;
use super::signals::{self, CritiqueSignal};
use super::types::{
    report, DialogueState, ExchangeKind, Phase, ProgressCallback, RefinementOutcome,
    TranscriptEntry,
};
use crate::article::Article;
use crate::chat::{ChatMessage, ChatService, ModelRole};
use crate::config::RefinementSettings;
use crate::notes::{parse, AtomicNote};

pub struct RefinementLoop {
    chat: Arc<dyn ChatService>,
    settings: RefinementSettings,
}

impl RefinementLoop {
    pub fn new(chat: Arc<dyn ChatService>, settings: RefinementSettings) -> Self {
        Self { chat, settings }
    }

    /// Run draft, then up to `max_rounds` critique cycles. Budget
    /// exhaustion without approval is a soft failure: the last parsed
    /// draft is returned with `approved == false`.
    pub async fn run(
        &self,
        article: &Article,
        interpretation: &str,
        state: &mut DialogueState,
        cancel: &CancellationToken,
        progress: Option<&ProgressCallback<'_>>,
    ) -> Result<RefinementOutcome> {
        let max_rounds = self.settings.max_rounds.max(1);
        let mut transcript: Vec<TranscriptEntry> = Vec::new();
        let mut dropped_segments = 0;

        report(
            progress,
            Phase::Drafting,
            None,
            Some(max_rounds),
            "drafting initial notes",
        );

        // The drafter keeps one running conversation: original prompt, its
        // own drafts, and each critique, so every revision sees the full
        // prior exchange.
        let mut history = vec![
            ChatMessage::system(prompts::DRAFTER_SYSTEM),
            ChatMessage::user(prompts::initial_draft(article, interpretation)),
        ];

        let mut draft = self
            .chat
            .chat(ModelRole::Drafter, &history, cancel)
            .await
            .context("Initial draft failed")?;
        history.push(ChatMessage::assistant(draft.clone()));
        state.current_draft = Some(draft.clone());
        transcript.push(TranscriptEntry {
            phase: Phase::Drafting,
            role: ModelRole::Drafter,
            kind: ExchangeKind::Draft,
            content: draft.clone(),
            round: 0,
        });

        let outcome = parse(&draft);
        dropped_segments += outcome.dropped;
        let mut notes: Vec<AtomicNote> = outcome.notes;

        let mut rounds = 0;
        let mut approved = false;

        while rounds < max_rounds {
            report(
                progress,
                Phase::Refining,
                Some(rounds + 1),
                Some(max_rounds),
                "requesting critique",
            );

            let critique_msgs = [
                ChatMessage::system(prompts::CRITIC_SYSTEM),
                ChatMessage::user(prompts::critique(&draft)),
            ];
            let critique = self
                .chat
                .chat(ModelRole::Critic, &critique_msgs, cancel)
                .await
                .context("Critique failed")?;

            rounds += 1;
            state.refinement_rounds = rounds;
            transcript.push(TranscriptEntry {
                phase: Phase::Refining,
                role: ModelRole::Critic,
                kind: ExchangeKind::Critique,
                content: critique.clone(),
                round: rounds,
            });

            match signals::classify_critique(&critique) {
                CritiqueSignal::Approved => {
                    tracing::info!(rounds, "draft approved");
                    approved = true;
                    break;
                }
                CritiqueSignal::Marginal => {
                    // Accepted as-is; remaining gains are not worth cost.
                    tracing::info!(rounds, "draft accepted as marginal");
                    approved = true;
                    break;
                }
                CritiqueSignal::NeedsWork => {
                    if rounds >= max_rounds {
                        // A revision now would never be reviewed.
                        break;
                    }

                    report(
                        progress,
                        Phase::Refining,
                        Some(rounds),
                        Some(max_rounds),
                        "revising draft",
                    );

                    history.push(ChatMessage::user(prompts::revision(&critique)));
                    let revision = self
                        .chat
                        .chat(ModelRole::Drafter, &history, cancel)
                        .await
                        .context("Revision failed")?;
                    history.push(ChatMessage::assistant(revision.clone()));
                    state.current_draft = Some(revision.clone());
                    transcript.push(TranscriptEntry {
                        phase: Phase::Refining,
                        role: ModelRole::Drafter,
                        kind: ExchangeKind::Revision,
                        content: revision.clone(),
                        round: rounds,
                    });

                    let outcome = parse(&revision);
                    dropped_segments += outcome.dropped;
                    notes = outcome.notes;
                    draft = revision;
                }
            }
        }

        Ok(RefinementOutcome {
            notes,
            raw_draft: draft,
            rounds_used: rounds,
            approved,
            transcript,
            dropped_segments,
        })
    }
}
