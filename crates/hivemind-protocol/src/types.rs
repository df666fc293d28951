//! Core data types shared by every Hivemind crate.
//!
//! Two families live here:
//!
//! - **Identity and phase**: [`PlayerId`], [`RoomId`], [`Phase`].
//! - **Views**: [`GameStateView`] and friends, the read-only snapshot that
//!   callers poll. These serialize with camelCase keys because browsers
//!   consume them directly.
//!
//! Plus [`Cluster`], the one shape the clustering collaborator is allowed
//! to answer with.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A caller-supplied identifier for a player, unique within one room.
///
/// Clients generate these (typically a random token kept in local storage)
/// so a player can re-identify themselves on every request without any
/// server-side login.
///
/// `#[serde(transparent)]` serializes this as the bare string, not
/// `{ "0": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Creates a `PlayerId` from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrows the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The external identifier of a room: a zero-padded numeric code
/// (8 digits by default) that players type in to join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Formats `code` as a zero-padded room id of `digits` characters.
    ///
    /// ```rust
    /// use hivemind_protocol::RoomId;
    ///
    /// assert_eq!(RoomId::from_code(42, 8).as_str(), "00000042");
    /// ```
    pub fn from_code(code: u64, digits: usize) -> Self {
        Self(format!("{code:0digits$}"))
    }

    /// Borrows the raw code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Phase: the round state machine
// ---------------------------------------------------------------------------

/// The room's current stage in the round lifecycle.
///
/// Transitions only move along these edges:
///
/// ```text
///                      ┌──────────────┐
///                      ▼              │ next round
/// Lobby ──start──→ Prompt ──eval──→ Results
///                      │              │
///                      └───eval───→ Ended ←┘
/// ```
///
/// - **Lobby**: players are gathering; no prompt yet.
/// - **Prompt**: a question is live and answers are being collected.
/// - **Results**: the round was scored; the host may start the next one.
/// - **Ended**: someone ran out of hive levels. Terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Lobby,
    Prompt,
    Results,
    Ended,
}

impl Phase {
    /// Returns `true` if transitioning to `target` is a legal edge.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Lobby, Self::Prompt)
                | (Self::Prompt, Self::Results)
                | (Self::Prompt, Self::Ended)
                | (Self::Results, Self::Prompt)
                | (Self::Results, Self::Ended)
        )
    }

    /// Returns `true` while answers are being collected.
    pub fn is_collecting(self) -> bool {
        matches!(self, Self::Prompt)
    }

    /// Returns `true` once no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Prompt => write!(f, "prompt"),
            Self::Results => write!(f, "results"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cluster: the collaborator's answer
// ---------------------------------------------------------------------------

/// One group of answers the collaborator considers equivalent.
///
/// This is the *schema* of the clustering reply: a JSON array of these.
/// Anything else (a bare object, a missing field, a number where a string
/// belongs, an extra key) fails to decode and the round stays open.
///
/// `answers` keeps whatever the collaborator returned, duplicates
/// included. A cluster's size is `answers.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Cluster {
    /// Short display name for the group ("Household pets").
    pub cluster_name: String,
    /// Member answers, as literal strings.
    pub answers: Vec<String>,
}

// ---------------------------------------------------------------------------
// Views: what callers get back from a snapshot
// ---------------------------------------------------------------------------

/// One answer inside a [`ClusterView`], with the names of every player
/// who submitted that exact string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    pub answer: String,
    pub players: Vec<String>,
}

/// A scored cluster as presented to players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterView {
    pub cluster_name: String,
    pub answers: Vec<AnswerView>,
}

/// The outcome of the most recent evaluated round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResults {
    /// Clusters in the order the collaborator returned them.
    pub clusters: Vec<ClusterView>,
    /// Names of every player who tied for the lowest score, roster order.
    pub losers: Vec<String>,
}

/// A player as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub profile: String,
    pub is_host: bool,
    pub hive_level: i32,
    pub score: u32,
    /// `None` if the player hasn't submitted this round, and always
    /// `None` while the room is in [`Phase::Prompt`].
    pub answers: Option<Vec<String>>,
}

/// A read-only, phase-appropriate copy of a room's state.
///
/// Callers compare `version` between polls to cheaply detect whether
/// anything changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub room_id: RoomId,
    pub phase: Phase,
    pub theme: String,
    pub prompt: Option<String>,
    pub prompt_history: Vec<String>,
    /// Players in join order.
    pub players: Vec<PlayerView>,
    pub version: u64,
    pub results: Option<RoundResults>,
}

impl GameStateView {
    /// Looks up a player by id.
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Returns the host, if anyone has joined (and the host hasn't left).
    pub fn host(&self) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.is_host)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Tests for the JSON shapes. Browsers read snapshots directly and the
    //! collaborator is prompted with the cluster schema, so a serde
    //! attribute drifting is a real bug.

    use super::*;

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_player_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&PlayerId::new("abc123")).unwrap();
        assert_eq!(json, "\"abc123\"");
    }

    #[test]
    fn test_room_id_from_code_zero_pads() {
        assert_eq!(RoomId::from_code(7, 8).to_string(), "00000007");
        assert_eq!(RoomId::from_code(99_999_999, 8).to_string(), "99999999");
        assert_eq!(RoomId::from_code(3, 1).to_string(), "3");
    }

    #[test]
    fn test_room_id_deserializes_from_plain_string() {
        let id: RoomId = serde_json::from_str("\"01234567\"").unwrap();
        assert_eq!(id.as_str(), "01234567");
    }

    // =====================================================================
    // Phase
    // =====================================================================

    #[test]
    fn test_phase_default_is_lobby() {
        assert_eq!(Phase::default(), Phase::Lobby);
    }

    #[test]
    fn test_phase_can_transition_to_legal_edges() {
        assert!(Phase::Lobby.can_transition_to(Phase::Prompt));
        assert!(Phase::Prompt.can_transition_to(Phase::Results));
        assert!(Phase::Prompt.can_transition_to(Phase::Ended));
        assert!(Phase::Results.can_transition_to(Phase::Prompt));
        assert!(Phase::Results.can_transition_to(Phase::Ended));
    }

    #[test]
    fn test_phase_can_transition_to_rejects_other_edges() {
        assert!(!Phase::Lobby.can_transition_to(Phase::Results));
        assert!(!Phase::Lobby.can_transition_to(Phase::Ended));
        assert!(!Phase::Prompt.can_transition_to(Phase::Lobby));
        assert!(!Phase::Results.can_transition_to(Phase::Lobby));
        for target in [Phase::Lobby, Phase::Prompt, Phase::Results, Phase::Ended] {
            assert!(!Phase::Ended.can_transition_to(target));
        }
    }

    #[test]
    fn test_phase_serializes_lowercase() {
        let json = serde_json::to_string(&Phase::Prompt).unwrap();
        assert_eq!(json, "\"prompt\"");
        assert_eq!(Phase::Ended.to_string(), "ended");
    }

    // =====================================================================
    // Cluster schema
    // =====================================================================

    #[test]
    fn test_cluster_uses_camel_case_name_field() {
        let cluster: Cluster = serde_json::from_str(
            r#"{"clusterName": "Pets", "answers": ["cat"]}"#,
        )
        .unwrap();
        assert_eq!(cluster.cluster_name, "Pets");
    }

    #[test]
    fn test_cluster_missing_answers_is_rejected() {
        let result: Result<Cluster, _> =
            serde_json::from_str(r#"{"clusterName": "Pets"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_cluster_non_string_answer_is_rejected() {
        let result: Result<Cluster, _> = serde_json::from_str(
            r#"{"clusterName": "Pets", "answers": ["cat", 3]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_cluster_unknown_field_is_rejected() {
        let result: Result<Cluster, _> = serde_json::from_str(
            r#"{"clusterName": "Pets", "answers": [], "confidence": 0.9}"#,
        );
        assert!(result.is_err());
    }

    // =====================================================================
    // Views
    // =====================================================================

    fn sample_view() -> GameStateView {
        GameStateView {
            room_id: RoomId::from_code(1234, 8),
            phase: Phase::Results,
            theme: "animals".into(),
            prompt: Some("Name a pet".into()),
            prompt_history: vec!["Name a pet".into()],
            players: vec![PlayerView {
                id: PlayerId::new("p1"),
                name: "Ada".into(),
                profile: "Classic Bee".into(),
                is_host: true,
                hive_level: 3,
                score: 2,
                answers: None,
            }],
            version: 9,
            results: Some(RoundResults {
                clusters: vec![ClusterView {
                    cluster_name: "Pets".into(),
                    answers: vec![AnswerView {
                        answer: "cat".into(),
                        players: vec!["Ada".into()],
                    }],
                }],
                losers: vec!["Ada".into()],
            }),
        }
    }

    #[test]
    fn test_game_state_view_json_uses_camel_case_keys() {
        let json = serde_json::to_value(sample_view()).unwrap();

        assert_eq!(json["roomId"], "00001234");
        assert_eq!(json["phase"], "results");
        assert_eq!(json["promptHistory"][0], "Name a pet");
        assert_eq!(json["players"][0]["isHost"], true);
        assert_eq!(json["players"][0]["hiveLevel"], 3);
        assert!(json["players"][0]["answers"].is_null());
        assert_eq!(json["results"]["clusters"][0]["clusterName"], "Pets");
        assert_eq!(json["results"]["losers"][0], "Ada");
    }

    #[test]
    fn test_game_state_view_player_and_host_lookup() {
        let view = sample_view();
        assert_eq!(view.player(&PlayerId::new("p1")).unwrap().name, "Ada");
        assert!(view.player(&PlayerId::new("nobody")).is_none());
        assert_eq!(view.host().unwrap().id, PlayerId::new("p1"));
    }
}
