//! Session configuration.

use std::time::Duration;

/// Profile assigned to players who don't pick one.
pub const DEFAULT_PROFILE: &str = "Classic Bee";

/// Tunables for a game session.
///
/// Override individual fields with struct update syntax:
///
/// ```rust
/// use std::time::Duration;
/// use hivemind_session::SessionConfig;
///
/// let config = SessionConfig {
///     completion_timeout: Duration::from_secs(10),
///     ..SessionConfig::default()
/// };
/// assert_eq!(config.starting_hive_level, 4);
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Hive level every player starts with. A player whose level drops
    /// below 1 ends the game.
    pub starting_hive_level: i32,

    /// Profile used when a joiner supplies none (or only whitespace).
    pub default_profile: String,

    /// Upper bound on a single collaborator call. On expiry the
    /// triggering action fails and nothing is committed.
    pub completion_timeout: Duration,

    /// Capacity of the session's command channel. Callers wait when it
    /// is full.
    pub channel_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_hive_level: 4,
            default_profile: DEFAULT_PROFILE.to_string(),
            completion_timeout: Duration::from_secs(30),
            channel_size: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.starting_hive_level, 4);
        assert_eq!(config.default_profile, "Classic Bee");
        assert_eq!(config.completion_timeout, Duration::from_secs(30));
        assert_eq!(config.channel_size, 64);
    }
}
