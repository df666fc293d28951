//! `Hivemind` builder and service.
//!
//! The service owns the room registry and the shared collaborator. It's
//! what a transport layer (HTTP handlers, a WebSocket loop, a CLI) holds
//! on to.

use std::sync::Arc;
use std::time::Duration;

use hivemind_llm::{ChatCompletionsClient, TextCompleter};
use hivemind_protocol::RoomId;
use hivemind_room::{RegistryConfig, RoomRegistry};
use hivemind_session::{SessionConfig, SessionHandle};

use crate::HivemindError;

/// Builder for configuring a [`Hivemind`] service.
///
/// `HivemindBuilder::new()` is the entry point whatever the collaborator;
/// the collaborator's type is fixed by [`build`](Self::build).
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use hivemind::prelude::*;
///
/// struct Canned;
///
/// impl TextCompleter for Canned {
///     async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
///         Ok("Name a breakfast food".into())
///     }
/// }
///
/// let hive = HivemindBuilder::new()
///     .completion_timeout(Duration::from_secs(10))
///     .starting_hive_level(3)
///     .build(Canned);
/// assert_eq!(hive.session_config().starting_hive_level, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HivemindBuilder {
    session_config: SessionConfig,
    registry_config: RegistryConfig,
}

impl HivemindBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Replaces the whole registry configuration.
    pub fn registry_config(mut self, config: RegistryConfig) -> Self {
        self.registry_config = config;
        self
    }

    /// Upper bound on one collaborator call.
    pub fn completion_timeout(mut self, timeout: Duration) -> Self {
        self.session_config.completion_timeout = timeout;
        self
    }

    /// Hive level every player starts with.
    pub fn starting_hive_level(mut self, level: i32) -> Self {
        self.session_config.starting_hive_level = level;
        self
    }

    /// Profile given to players who don't choose one.
    pub fn default_profile(mut self, profile: impl Into<String>) -> Self {
        self.session_config.default_profile = profile.into();
        self
    }

    /// Number of digits in a room code.
    pub fn code_digits(mut self, digits: u32) -> Self {
        self.registry_config.code_digits = digits;
        self
    }

    /// Builds the service around `completer`.
    pub fn build<C: TextCompleter>(self, completer: C) -> Hivemind<C> {
        self.build_shared(Arc::new(completer))
    }

    /// Like [`build`](Self::build), for a collaborator that's already
    /// shared elsewhere.
    pub fn build_shared<C: TextCompleter>(self, completer: Arc<C>) -> Hivemind<C> {
        tracing::debug!(
            code_digits = self.registry_config.digits(),
            starting_hive_level = self.session_config.starting_hive_level,
            completion_timeout = ?self.session_config.completion_timeout,
            "hivemind service built"
        );
        let registry = RoomRegistry::new(
            completer,
            self.session_config.clone(),
            self.registry_config,
        );
        Hivemind {
            registry: Arc::new(registry),
            session_config: self.session_config,
        }
    }

    /// Builds the service around an HTTP chat-completions client
    /// configured from the environment (`HIVEMIND_LLM_URL`,
    /// `HIVEMIND_LLM_API_KEY`, `HIVEMIND_LLM_MODEL`).
    ///
    /// # Errors
    /// [`HivemindError::Completion`] if a variable is missing or the
    /// client can't be created.
    pub fn build_from_env(
        self,
    ) -> Result<Hivemind<ChatCompletionsClient>, HivemindError> {
        Ok(self.build(ChatCompletionsClient::from_env()?))
    }
}

/// A running Hivemind service.
///
/// Cheap to clone; clones share the same rooms.
pub struct Hivemind<C: TextCompleter> {
    registry: Arc<RoomRegistry<C>>,
    session_config: SessionConfig,
}

impl<C: TextCompleter> Clone for Hivemind<C> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            session_config: self.session_config.clone(),
        }
    }
}

impl Hivemind<ChatCompletionsClient> {
    /// Shorthand for [`HivemindBuilder::new`] when the builder will be
    /// finished with [`build_from_env`](HivemindBuilder::build_from_env).
    /// Other collaborators start from `HivemindBuilder::new()`.
    pub fn builder() -> HivemindBuilder {
        HivemindBuilder::new()
    }
}

impl<C: TextCompleter> Hivemind<C> {
    /// Opens a room with `theme`. Must be called from within a Tokio
    /// runtime.
    pub async fn create_room(
        &self,
        theme: impl Into<String>,
    ) -> Result<(RoomId, SessionHandle), HivemindError> {
        Ok(self.registry.create_session(theme).await?)
    }

    /// Looks up a room by code.
    pub async fn room(
        &self,
        room_id: &RoomId,
    ) -> Result<SessionHandle, HivemindError> {
        Ok(self.registry.get_session(room_id).await?)
    }

    /// Closes a room. Outstanding handles start returning
    /// `Unavailable`.
    pub async fn remove_room(&self, room_id: &RoomId) -> Result<(), HivemindError> {
        Ok(self.registry.remove_session(room_id).await?)
    }

    /// Number of open rooms.
    pub async fn room_count(&self) -> usize {
        self.registry.room_count().await
    }

    /// Codes of every open room.
    pub async fn room_ids(&self) -> Vec<RoomId> {
        self.registry.room_ids().await
    }

    /// The underlying registry.
    pub fn registry(&self) -> &RoomRegistry<C> {
        &self.registry
    }

    /// Settings every new room is created with.
    pub fn session_config(&self) -> &SessionConfig {
        &self.session_config
    }
}
