/// Errors a [`TextCompleter`](crate::TextCompleter) can report.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The client is missing a setting (URL, key, model).
    #[error("completion client misconfigured: {0}")]
    Config(String),

    /// The request never produced a usable HTTP response.
    #[cfg(feature = "http")]
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered but the reply had no text in it.
    #[error("completion service returned no content")]
    EmptyResponse,

    /// Any other backend failure.
    #[error("completion failed: {0}")]
    Failed(String),
}
