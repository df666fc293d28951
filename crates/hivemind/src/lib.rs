//! # Hivemind
//!
//! Core of a party word-association game. Players join a room, a language
//! model writes a prompt, everyone answers, and the model groups answers
//! that mean the same thing. Answers in big groups score well; the
//! lowest scorers lose hive levels, and the game ends when someone's hive
//! runs out.
//!
//! This crate ties the layers together:
//! `hivemind-llm` (collaborator) → `hivemind-session` (one room's game)
//! → `hivemind-room` (room codes and lookup).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hivemind::prelude::*;
//!
//! # async fn run() -> Result<(), HivemindError> {
//! hivemind::init_tracing();
//!
//! let hive = HivemindBuilder::new().build_from_env()?;
//! let (room_id, room) = hive.create_room("breakfast").await?;
//!
//! room.add_player(PlayerId::new("p1"), "Ada", None).await?;
//! room.start_game(PlayerId::new("p1")).await?;
//! println!("{room_id}: {:?}", room.snapshot().await?.prompt);
//! # Ok(())
//! # }
//! ```

mod error;
mod service;
mod telemetry;

pub use error::HivemindError;
pub use service::{Hivemind, HivemindBuilder};
pub use telemetry::{DEFAULT_LOG_FILTER, init_tracing};

pub use hivemind_llm as llm;
pub use hivemind_protocol as protocol;
pub use hivemind_room as room;
pub use hivemind_session as session;

/// Everything a typical caller needs.
pub mod prelude {
    pub use crate::{Hivemind, HivemindBuilder, HivemindError};
    pub use hivemind_llm::{
        ChatCompletionsClient, ChatConfig, CompletionError, TextCompleter,
    };
    pub use hivemind_protocol::{
        Cluster, GameStateView, Phase, PlayerId, PlayerView, RoomId,
        RoundResults,
    };
    pub use hivemind_room::{RegistryConfig, RoomError};
    pub use hivemind_session::{
        Rejection, SessionConfig, SessionError, SessionHandle,
    };
}
