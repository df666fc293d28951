//! Text-completion collaborator for Hivemind.
//!
//! Rooms need a language model for exactly two things: writing the next
//! prompt, and clustering the answers a round produced. Both are plain
//! "text in, text out" calls, so the whole dependency is one trait,
//! [`TextCompleter`].
//!
//! # Feature Flags
//!
//! - `http` (default) - [`ChatCompletionsClient`], an OpenAI-compatible
//!   `/v1/chat/completions` client via `reqwest`

#![allow(async_fn_in_trait)]

#[cfg(feature = "http")]
mod chat;
mod error;

#[cfg(feature = "http")]
pub use chat::{
    ChatCompletionsClient, ChatConfig, ENV_API_KEY, ENV_BASE_URL, ENV_MODEL,
};
pub use error::CompletionError;

use std::future::Future;
use std::sync::Arc;

/// Turns a prompt into a completion.
///
/// Sessions call this while holding their room, so implementations should
/// not retry internally; the session bounds every call with its own
/// timeout and treats any `Err` as "the triggering action did not happen".
///
/// # Example
///
/// ```rust
/// use hivemind_llm::{CompletionError, TextCompleter};
///
/// /// Always proposes the same prompt. Handy for local play-testing.
/// struct FixedPrompt;
///
/// impl TextCompleter for FixedPrompt {
///     async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
///         Ok("Name three things you find in a kitchen".into())
///     }
/// }
/// ```
pub trait TextCompleter: Send + Sync + 'static {
    /// Sends `prompt` to the model and returns its reply text.
    ///
    /// # Errors
    /// Any transport, authorization, rate-limit, or decoding failure.
    /// Callers don't distinguish between them.
    fn complete(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

impl<T: TextCompleter> TextCompleter for Arc<T> {
    fn complete(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send {
        (**self).complete(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl TextCompleter for Echo {
        async fn complete(
            &self,
            prompt: &str,
        ) -> Result<String, CompletionError> {
            Ok(prompt.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_arc_completer_delegates_to_inner() {
        let shared = Arc::new(Echo);
        let reply = shared.complete("buzz").await.unwrap();
        assert_eq!(reply, "BUZZ");
    }
}
