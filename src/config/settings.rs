// Configuration structs
//
// Everything here is injected, read-only session configuration: model
// identifiers per role, round budgets, classification tunables, and the
// advisory note-quality thresholds.

use serde::{Deserialize, Serialize};

use crate::notes::NoteRules;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API credential for the chat endpoint.
    pub api_key: String,

    /// Base URL of an OpenAI-compatible endpoint.
    pub base_url: String,

    /// Model identifier used for the drafter role.
    pub drafter_model: String,

    /// Model identifier used for the critic role.
    pub critic_model: String,

    /// Interpretation alignment phase tunables.
    pub alignment: AlignmentSettings,

    /// Draft-critique-revise loop tunables.
    pub refinement: RefinementSettings,

    /// Advisory note validation thresholds.
    pub rules: NoteRules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com".to_string(),
            drafter_model: "gpt-4o".to_string(),
            critic_model: "gpt-4o-mini".to_string(),
            alignment: AlignmentSettings::default(),
            refinement: RefinementSettings::default(),
            rules: NoteRules::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentSettings {
    /// Round budget for the alignment phase (>= 1; round 1 is the parallel
    /// interpretation fan-out).
    pub max_rounds: usize,

    /// Minimum character length for an extracted alignment summary. A
    /// shorter remainder (e.g. a bare "ALIGNED.") falls back to the other
    /// role's last interpretation. Tunable, not a protocol invariant.
    pub min_summary_chars: usize,

    /// Character ceiling applied to article content before it is shown to
    /// either role. Cut lands on a word boundary.
    pub content_char_ceiling: usize,
}

impl Default for AlignmentSettings {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            min_summary_chars: 20,
            content_char_ceiling: 12_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementSettings {
    /// Round budget for critique cycles (>= 1).
    pub max_rounds: usize,
}

impl Default for RefinementSettings {
    fn default() -> Self {
        Self { max_rounds: 4 }
    }
}
