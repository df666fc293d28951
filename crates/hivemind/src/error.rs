//! Unified error type for Hivemind.

use hivemind_llm::CompletionError;
use hivemind_protocol::ProtocolError;
use hivemind_room::RoomError;
use hivemind_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` on each variant lets `?` convert sub-crate errors, so
/// callers of the facade only match on this one type.
#[derive(Debug, thiserror::Error)]
pub enum HivemindError {
    /// The collaborator couldn't be configured or reached.
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// Encoding or decoding failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session operation failed or was rejected.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A registry operation failed (room not found, codes exhausted).
    #[error(transparent)]
    Room(#[from] RoomError),
}

impl HivemindError {
    /// Returns `true` for session precondition rejections. These never
    /// change a room, so a client can just refresh its snapshot.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Session(e) if e.is_rejection())
    }
}

#[cfg(test)]
mod tests {
    use hivemind_protocol::{PlayerId, RoomId};
    use hivemind_session::Rejection;

    use super::*;

    #[test]
    fn test_from_completion_error() {
        let err: HivemindError = CompletionError::Config("no url".into()).into();
        assert!(matches!(err, HivemindError::Completion(_)));
        assert!(err.to_string().contains("no url"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err: HivemindError =
            ProtocolError::InvalidMessage("bad".into()).into();
        assert!(matches!(err, HivemindError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err: HivemindError =
            SessionError::Unavailable(RoomId::from_code(1, 8)).into();
        assert!(matches!(err, HivemindError::Session(_)));
        assert!(err.to_string().contains("00000001"));
        assert!(!err.is_rejection());
    }

    #[test]
    fn test_from_room_error() {
        let err: HivemindError =
            RoomError::NotFound(RoomId::from_code(9, 8)).into();
        assert!(matches!(err, HivemindError::Room(_)));
    }

    #[test]
    fn test_is_rejection_sees_through_session_error() {
        let err: HivemindError = SessionError::Rejected(Rejection::NotHost(
            PlayerId::new("p2"),
        ))
        .into();
        assert!(err.is_rejection());
    }
}
