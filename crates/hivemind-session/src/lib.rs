//! Game sessions for Hivemind.
//!
//! A session is one room's game: the player roster, the current phase,
//! the prompt history and the last round's results. Each session runs as
//! an isolated Tokio task (actor model) and is driven through a
//! [`SessionHandle`].
//!
//! ```text
//!             start_game (host)        all players submitted
//!   Lobby ───────────────────▶ Prompt ─────────────────────▶ Results
//!                                ▲                             │
//!                                └──────── next_round (host) ──┘
//!                                │
//!                                └── a hive level drops below 1 ──▶ Ended
//! ```
//!
//! # Key types
//!
//! - [`SessionHandle`]: send commands to a running session
//! - [`spawn_session`]: start a session task
//! - [`SessionConfig`]: starting hive level, default profile, timeouts
//! - [`SessionError`] / [`Rejection`]: what can go wrong
//!
//! The pure pieces live in [`scoring`] and [`prompts`] and can be used
//! without a runtime.

mod config;
mod error;
pub mod prompts;
pub mod scoring;
mod session;
mod state;

pub use config::{DEFAULT_PROFILE, SessionConfig};
pub use error::{Rejection, SessionError};
pub use session::{SessionHandle, spawn_session};
