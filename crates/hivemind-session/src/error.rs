//! Error types for the session layer.

use std::time::Duration;

use hivemind_llm::CompletionError;
use hivemind_protocol::{Phase, PlayerId, ProtocolError, RoomId};

/// Why a request was turned away without touching the room.
///
/// These are "stale client" conditions: the caller acted on an old
/// snapshot. They never change state or `version`, so ignoring them and
/// re-polling is always safe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The operation isn't valid in the room's current phase.
    #[error("requires phase {required}, room is in {actual}")]
    WrongPhase { required: Phase, actual: Phase },

    /// Only the host may start the game or advance rounds.
    #[error("player {0} is not the host")]
    NotHost(PlayerId),

    /// No player with this id is in the room.
    #[error("player {0} is not in this room")]
    UnknownPlayer(PlayerId),

    /// A player with this id already joined.
    #[error("player {0} already joined")]
    DuplicatePlayer(PlayerId),

    /// Display names must contain something other than whitespace.
    #[error("player name must not be blank")]
    BlankName,
}

/// Errors returned by [`SessionHandle`](crate::SessionHandle) operations.
///
/// Apart from [`SessionError::Rejected`], every variant means "the
/// action did not complete": the room looks exactly as it did before,
/// and the caller may retry.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A precondition failed. Nothing changed.
    #[error("request rejected: {0}")]
    Rejected(#[from] Rejection),

    /// The text-generation collaborator failed.
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// The collaborator didn't answer within the configured timeout.
    #[error("collaborator timed out after {0:?}")]
    Timeout(Duration),

    /// The collaborator answered, but not in a usable shape.
    #[error("collaborator reply unusable: {0}")]
    MalformedResponse(#[source] ProtocolError),

    /// Building the collaborator request failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session task has stopped (room removed).
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}

impl SessionError {
    /// Returns `true` for precondition rejections, which callers
    /// typically treat as a no-op.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_converts_into_session_error() {
        let err: SessionError = Rejection::BlankName.into();
        assert!(err.is_rejection());
        assert_eq!(
            err.to_string(),
            "request rejected: player name must not be blank"
        );
    }

    #[test]
    fn test_wrong_phase_message_names_both_phases() {
        let err = Rejection::WrongPhase {
            required: Phase::Lobby,
            actual: Phase::Results,
        };
        assert_eq!(err.to_string(), "requires phase lobby, room is in results");
    }

    #[test]
    fn test_completion_error_is_not_rejection() {
        let err: SessionError = CompletionError::EmptyResponse.into();
        assert!(!err.is_rejection());
    }
}
