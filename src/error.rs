use thiserror::Error;

/// Failures of the text-generation backend
///
/// These are values, not process-fatal errors: the caller treats any of them
/// as "skip this post for now" and moves on.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The chat-completion request itself failed (network, auth, rate limit)
    #[error("chat completion request failed: {0}")]
    Api(String),

    /// The model answered but the reply was empty after trimming
    #[error("model returned an empty reply")]
    Empty,
}

/// Failures of the browser session as a whole
#[derive(Debug, Error)]
pub enum SessionError {
    /// Manual login was never detected within the polling window
    #[error("manual login was not detected within {0} seconds")]
    LoginTimeout(u64),

    /// The driver stopped responding; the session is considered dead
    #[error("browser session lost: {0}")]
    Lost(String),
}
