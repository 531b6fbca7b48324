// Protocol constants
//
// Centralised here so retry behavior and request shape have one source of
// truth. Import via `use crate::config::constants::*;`.

/// Total request attempts (first try included) before a retryable failure
/// becomes terminal.
pub const MAX_RETRIES: u32 = 3;

/// Base backoff delay; doubled on each attempt.
pub const BASE_DELAY_MS: u64 = 1000;

/// Ceiling on any single backoff delay, jitter included.
pub const MAX_DELAY_MS: u64 = 10_000;

/// Upper bound of the uniform jitter added to each backoff delay, to avoid
/// synchronized retry storms.
pub const MAX_JITTER_MS: u64 = 1000;

/// HTTP statuses worth retrying. Everything else non-2xx is terminal.
pub const RETRYABLE_STATUS: [u16; 4] = [429, 502, 503, 504];

/// Per-request timeout for the HTTP client.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Fixed sampling temperature for all dialogue requests.
pub const CHAT_TEMPERATURE: f32 = 0.7;

/// Max-output-token ceiling sent with every request.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Appended to article content cut at the character ceiling.
pub const TRUNCATION_NOTICE: &str = "\n\n[... content truncated ...]";
