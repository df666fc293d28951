//! Shared data types for Hivemind.
//!
//! This crate defines the "language" spoken at the edges of a game room:
//!
//! - **Types** ([`PlayerId`], [`RoomId`], [`Phase`], [`GameStateView`], etc.):
//!   identities, the round phase, and the read-only snapshot handed to
//!   callers.
//! - **Cluster payload** ([`Cluster`]): the exact shape the clustering
//!   collaborator must answer with.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those values are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about locking, rooms, or the language
//! model. It only knows what the data looks like.
//!
//! ```text
//! Collaborator (text) → Protocol (Cluster) → Session (scores, snapshot)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod error;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    AnswerView, Cluster, ClusterView, GameStateView, Phase, PlayerId,
    PlayerView, RoomId, RoundResults,
};
