// Interpretation alignment phase
//
// Drives the two roles to a converged understanding of the article before
// any notes are drafted. Round 1 is the parallel interpretation fan-out
// (the only concurrent requests in a session); every later round alternates
// one role reviewing the other's latest interpretation.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use super::prompts;
use super::signals;
use super::types::{report, AlignmentOutcome, DialogueState, Phase, ProgressCallback};
use crate::article::{truncate_at_word_boundary, Article};
use crate::chat::{ChatMessage, ChatService, ModelRole};
use crate::config::AlignmentSettings;

pub struct AlignmentPhase {
    chat: Arc<dyn ChatService>,
    settings: AlignmentSettings,
}

impl AlignmentPhase {
    pub fn new(chat: Arc<dyn ChatService>, settings: AlignmentSettings) -> Self {
        Self { chat, settings }
    }

    /// Run the phase to completion. Exhausting the round budget is not a
    /// failure: the outcome then carries a synthesized interpretation with
    /// `aligned == false`.
    pub async fn run(
        &self,
        article: &Article,
        state: &mut DialogueState,
        cancel: &CancellationToken,
        progress: Option<&ProgressCallback<'_>>,
    ) -> Result<AlignmentOutcome> {
        let max_rounds = self.settings.max_rounds.max(1);
        let content =
            truncate_at_word_boundary(&article.content, self.settings.content_char_ceiling);

        report(
            progress,
            Phase::Interpreting,
            Some(1),
            Some(max_rounds),
            "requesting independent interpretations",
        );

        let drafter_msgs = [
            ChatMessage::system(prompts::DRAFTER_SYSTEM),
            ChatMessage::user(prompts::interpretation(article, &content)),
        ];
        let critic_msgs = [
            ChatMessage::system(prompts::CRITIC_SYSTEM),
            ChatMessage::user(prompts::interpretation(article, &content)),
        ];

        let (mut drafter_interp, mut critic_interp) = tokio::try_join!(
            self.chat.chat(ModelRole::Drafter, &drafter_msgs, cancel),
            self.chat.chat(ModelRole::Critic, &critic_msgs, cancel),
        )
        .context("Interpretation fan-out failed")?;

        state.drafter_interpretation = Some(drafter_interp.clone());
        state.critic_interpretation = Some(critic_interp.clone());

        let mut rounds = 1;
        state.interpretation_rounds = rounds;

        // The critic reviews the drafter's reading first; control alternates
        // each round.
        let mut responder = ModelRole::Critic;

        while rounds < max_rounds {
            rounds += 1;
            state.interpretation_rounds = rounds;
            report(
                progress,
                Phase::Interpreting,
                Some(rounds),
                Some(max_rounds),
                format!("{} reviewing the other interpretation", responder.label()),
            );

            let (own, other) = match responder {
                ModelRole::Critic => (&critic_interp, &drafter_interp),
                ModelRole::Drafter => (&drafter_interp, &critic_interp),
            };
            let messages = [
                ChatMessage::system(prompts::system_for(responder)),
                ChatMessage::user(prompts::alignment_review(own, other)),
            ];

            let reply = self
                .chat
                .chat(responder, &messages, cancel)
                .await
                .context("Alignment exchange failed")?;

            if let Some(summary) = signals::alignment_summary(&reply) {
                // Guard against a degenerate bare "ALIGNED." reply: fall
                // back to the interpretation the responder was shown.
                let interpretation = if summary.chars().count()
                    >= self.settings.min_summary_chars
                {
                    summary
                } else {
                    tracing::debug!(
                        chars = summary.chars().count(),
                        "alignment summary too short, using last interpretation"
                    );
                    other.clone()
                };

                tracing::info!(rounds, "interpretations aligned");
                return Ok(AlignmentOutcome {
                    aligned: true,
                    interpretation,
                    drafter_interpretation: drafter_interp,
                    critic_interpretation: critic_interp,
                    rounds_used: rounds,
                });
            }

            match responder {
                ModelRole::Critic => {
                    critic_interp = reply;
                    state.critic_interpretation = Some(critic_interp.clone());
                }
                ModelRole::Drafter => {
                    drafter_interp = reply;
                    state.drafter_interpretation = Some(drafter_interp.clone());
                }
            }
            responder = responder.other();
        }

        tracing::info!(rounds, "round budget exhausted, synthesizing interpretation");
        let interpretation = prompts::synthesized(&drafter_interp, &critic_interp);

        Ok(AlignmentOutcome {
            aligned: false,
            interpretation,
            drafter_interpretation: drafter_interp,
            critic_interpretation: critic_interp,
            rounds_used: rounds,
        })
    }
}
