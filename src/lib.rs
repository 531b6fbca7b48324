// Noteforge — two-role model dialogue for distilling articles into atomic notes
// Library exports

pub mod article;
pub mod chat;
pub mod config;
pub mod dialogue;
pub mod notes;
pub mod sink;

pub use article::Article;
pub use chat::{ChatError, ChatMessage, ChatService, HttpChatClient, ModelRole};
pub use config::{load_settings, Settings};
pub use dialogue::{DialogueOrchestrator, DialogueResult, DialogueState, Phase};
pub use notes::{parse, validate, AtomicNote, NoteRules};
