// Resilient request layer
//
// Issues a single logical chat request to a named role, retries transient
// failures with exponential backoff + jitter, classifies failures as
// retryable or terminal, and counts successful calls.

mod client;
mod error;
mod types;

pub use client::{ChatService, HttpChatClient};
pub use error::ChatError;
pub use types::{ChatMessage, ModelRole, Role};
