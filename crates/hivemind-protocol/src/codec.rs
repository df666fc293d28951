//! Codec trait and implementations for serializing/deserializing data.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The session layer decodes the collaborator's cluster payload through a
//! [`Codec`], and callers may encode snapshots with the same one. Nothing
//! else depends on the concrete format.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// - `Send + Sync` → shareable between Tokio worker threads.
/// - `'static` → owns everything it needs, so it can live inside a
///   long-running session task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// The collaborator is asked to answer in JSON, and snapshots are served
/// to browsers as JSON, so this is the only codec the workspace needs.
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use hivemind_protocol::{Cluster, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let raw = br#"[{"clusterName": "Pets", "answers": ["cat", "dog"]}]"#;
///
/// let clusters: Vec<Cluster> = codec.decode(raw).unwrap();
/// assert_eq!(clusters[0].cluster_name, "Pets");
/// assert_eq!(clusters[0].answers.len(), 2);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{Cluster, Phase};

    #[test]
    fn test_json_codec_decode_cluster_array() {
        let raw = br#"[
            {"clusterName": "Pets", "answers": ["cat", "dog", "dog"]},
            {"clusterName": "Birds", "answers": ["owl"]}
        ]"#;
        let clusters: Vec<Cluster> = JsonCodec.decode(raw).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].answers, vec!["cat", "dog", "dog"]);
    }

    #[test]
    fn test_json_codec_decode_garbage_returns_decode_error() {
        let result: Result<Vec<Cluster>, _> =
            JsonCodec.decode(b"Sure! Here are the clusters:");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_encode_phase() {
        let bytes = JsonCodec.encode(&Phase::Results).unwrap();
        assert_eq!(bytes, b"\"results\"");
    }
}
