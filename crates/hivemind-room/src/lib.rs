//! Room registry for Hivemind.
//!
//! The registry hands out room codes and keeps a handle to every live
//! session. It knows nothing about the game itself; that lives in
//! `hivemind-session`.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: creates, looks up, and removes rooms
//! - [`RegistryConfig`]: room code length
//! - [`RoomError`]: what can go wrong

mod config;
mod error;
mod registry;

pub use config::RegistryConfig;
pub use error::RoomError;
pub use registry::RoomRegistry;
