//! Error types for the room layer.

use hivemind_protocol::RoomId;

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No live room has this code.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Every code is taken. No room was created.
    #[error("no free room codes left ({capacity} rooms active)")]
    Exhausted { capacity: u64 },
}
