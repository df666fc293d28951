//! Room registry: allocates room codes and tracks live sessions.

use std::collections::HashMap;
use std::sync::Arc;

use hivemind_llm::TextCompleter;
use hivemind_protocol::RoomId;
use hivemind_session::{SessionConfig, SessionHandle, spawn_session};
use rand::Rng;
use tokio::sync::Mutex;

use crate::{RegistryConfig, RoomError};

/// Creates rooms, finds them by code, and removes them.
///
/// One mutex guards the code → handle map; it is held only for the map
/// operation itself, never while a session is doing work. Every room
/// gets its own session task, so rooms don't contend with each other
/// after creation.
///
/// Rooms are kept until [`remove_session`](Self::remove_session) is
/// called. There is no idle eviction.
pub struct RoomRegistry<C: TextCompleter> {
    rooms: Mutex<HashMap<RoomId, SessionHandle>>,
    completer: Arc<C>,
    session_config: SessionConfig,
    config: RegistryConfig,
}

impl<C: TextCompleter> RoomRegistry<C> {
    /// Creates an empty registry. Every session it spawns shares
    /// `completer` and is configured with `session_config`.
    pub fn new(
        completer: Arc<C>,
        session_config: SessionConfig,
        config: RegistryConfig,
    ) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            completer,
            session_config,
            config,
        }
    }

    /// Opens a new room with `theme` and returns its code and handle.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// [`RoomError::Exhausted`] when every code is in use.
    pub async fn create_session(
        &self,
        theme: impl Into<String>,
    ) -> Result<(RoomId, SessionHandle), RoomError> {
        let mut rooms = self.rooms.lock().await;

        let capacity = self.config.capacity();
        if rooms.len() as u64 >= capacity {
            tracing::warn!(capacity, "room codes exhausted");
            return Err(RoomError::Exhausted { capacity });
        }

        let room_id = unique_room_code(&rooms, &self.config);
        let handle = spawn_session(
            room_id.clone(),
            theme,
            self.session_config.clone(),
            Arc::clone(&self.completer),
        );
        rooms.insert(room_id.clone(), handle.clone());

        tracing::info!(%room_id, rooms = rooms.len(), "room created");
        Ok((room_id, handle))
    }

    /// Returns the handle for `room_id`.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if no such room is registered.
    pub async fn get_session(
        &self,
        room_id: &RoomId,
    ) -> Result<SessionHandle, RoomError> {
        self.rooms
            .lock()
            .await
            .get(room_id)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }

    /// Unregisters `room_id` and stops its session. Handles other callers
    /// still hold start returning `Unavailable`. The code becomes free
    /// for reuse.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if no such room is registered.
    pub async fn remove_session(&self, room_id: &RoomId) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .lock()
            .await
            .remove(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        // Already stopped is as good as stopped.
        let _ = handle.shutdown().await;
        tracing::info!(%room_id, "room removed");
        Ok(())
    }

    /// Number of registered rooms.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    /// Codes of every registered room, in no particular order.
    pub async fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.lock().await.keys().cloned().collect()
    }

    /// The registry's configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

/// Draws codes uniformly at random until one isn't taken.
///
/// The caller guarantees at least one free code, so this terminates.
fn unique_room_code(
    taken: &HashMap<RoomId, SessionHandle>,
    config: &RegistryConfig,
) -> RoomId {
    let mut rng = rand::rng();
    let digits = config.digits() as usize;
    loop {
        let code = rng.random_range(0..config.capacity());
        let room_id = RoomId::from_code(code, digits);
        if !taken.contains_key(&room_id) {
            return room_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_room_code_is_zero_padded() {
        let config = RegistryConfig::default();
        for _ in 0..100 {
            let code = unique_room_code(&HashMap::new(), &config);
            assert_eq!(code.as_str().len(), 8);
            assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
        }
    }
}
