// Conversation types shared by the request layer and the dialogue phases

use serde::{Deserialize, Serialize};

/// Message role in a chat conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a conversation. An ordered sequence of these forms
/// the context for each subsequent request; the protocol accumulates history
/// rather than enforcing strict role alternation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The two dialogue participants. Each maps to one configured model
/// identifier; the mapping is injected via `Settings`, never hardcoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    Drafter,
    Critic,
}

impl ModelRole {
    /// The opposite participant.
    pub fn other(&self) -> ModelRole {
        match self {
            ModelRole::Drafter => ModelRole::Critic,
            ModelRole::Critic => ModelRole::Drafter,
        }
    }

    /// Stable lowercase label for logging and progress messages.
    pub fn label(&self) -> &'static str {
        match self {
            ModelRole::Drafter => "drafter",
            ModelRole::Critic => "critic",
        }
    }
}

impl std::fmt::Display for ModelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = ChatMessage::assistant("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"assistant\""));
    }

    #[test]
    fn test_model_role_other() {
        assert_eq!(ModelRole::Drafter.other(), ModelRole::Critic);
        assert_eq!(ModelRole::Critic.other(), ModelRole::Drafter);
    }

    #[test]
    fn test_model_role_label() {
        assert_eq!(ModelRole::Drafter.label(), "drafter");
        assert_eq!(ModelRole::Critic.to_string(), "critic");
    }
}
