//! Error types for the protocol layer.
//!
//! Each crate in Hivemind defines its own error enum. When you see a
//! `ProtocolError`, the problem is in the shape of some data, not in the
//! collaborator's transport or the room's rules.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields,
    /// wrong data types, or unexpected extra fields.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The data is unusable before it even reaches the decoder,
    /// e.g. an empty reply where a cluster array was expected.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
