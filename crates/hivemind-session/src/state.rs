//! Authoritative room state and the synchronous rules that mutate it.
//!
//! Nothing in here awaits. The session actor does the collaborator round
//! trip first and only then calls into [`GameState`] to commit, so a
//! failed or slow call can never leave a half-applied round behind.
//!
//! Every successful mutation bumps `version` exactly once. Rejections
//! return before touching anything.

use hivemind_protocol::{
    Cluster, GameStateView, Phase, PlayerId, PlayerView, RoomId, RoundResults,
};

use crate::scoring;
use crate::Rejection;

/// A player as stored by the session.
#[derive(Debug, Clone)]
pub(crate) struct Player {
    pub(crate) id: PlayerId,
    pub(crate) name: String,
    pub(crate) profile: String,
    pub(crate) is_host: bool,
    pub(crate) hive_level: i32,
    pub(crate) score: u32,
    pub(crate) answers: Option<Vec<String>>,
}

/// What a committed evaluation did, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoundSummary {
    pub(crate) phase: Phase,
    pub(crate) lowest_score: Option<u32>,
    pub(crate) losers: usize,
}

/// The full state of one room.
#[derive(Debug, Clone)]
pub(crate) struct GameState {
    pub(crate) room_id: RoomId,
    pub(crate) phase: Phase,
    pub(crate) theme: String,
    pub(crate) prompt: Option<String>,
    pub(crate) prompt_history: Vec<String>,
    /// Join order. Rosters are a handful of players, so lookups scan.
    pub(crate) players: Vec<Player>,
    pub(crate) version: u64,
    pub(crate) results: Option<RoundResults>,
    /// Set once the first player joins; survives that player leaving, so
    /// host status is never handed to anyone else.
    host_assigned: bool,
}

impl GameState {
    pub(crate) fn new(room_id: RoomId, theme: String) -> Self {
        Self {
            room_id,
            phase: Phase::Lobby,
            theme,
            prompt: None,
            prompt_history: Vec::new(),
            players: Vec::new(),
            version: 0,
            results: None,
            host_assigned: false,
        }
    }

    fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    fn transition(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal phase edge {} -> {}",
            self.phase,
            next
        );
        self.phase = next;
    }

    // -- Roster ----------------------------------------------------------

    /// Appends a player. The first player ever to join becomes host.
    ///
    /// `name` and `profile` are expected to be trimmed already; an empty
    /// `profile` should have been replaced by the default.
    pub(crate) fn add_player(
        &mut self,
        id: PlayerId,
        name: String,
        profile: String,
        hive_level: i32,
    ) -> Result<(), Rejection> {
        if name.is_empty() {
            return Err(Rejection::BlankName);
        }
        if self.player(&id).is_some() {
            return Err(Rejection::DuplicatePlayer(id));
        }

        let is_host = !self.host_assigned;
        self.host_assigned = true;
        self.players.push(Player {
            id,
            name,
            profile,
            is_host,
            hive_level,
            score: 0,
            answers: None,
        });
        self.bump();
        Ok(())
    }

    /// Removes a player. Host status is not reassigned.
    pub(crate) fn remove_player(
        &mut self,
        id: &PlayerId,
    ) -> Result<(), Rejection> {
        let index = self
            .players
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| Rejection::UnknownPlayer(id.clone()))?;
        self.players.remove(index);
        self.bump();
        Ok(())
    }

    // -- Round lifecycle --------------------------------------------------

    /// Checks that `requester` is the host and the room is in `required`.
    /// Used before fetching a prompt, so no collaborator call is made for
    /// a request that would be rejected anyway.
    pub(crate) fn ensure_host_in(
        &self,
        requester: &PlayerId,
        required: Phase,
    ) -> Result<(), Rejection> {
        if self.phase != required {
            return Err(Rejection::WrongPhase {
                required,
                actual: self.phase,
            });
        }
        match self.player(requester) {
            Some(player) if player.is_host => Ok(()),
            Some(_) => Err(Rejection::NotHost(requester.clone())),
            None => Err(Rejection::UnknownPlayer(requester.clone())),
        }
    }

    /// Opens a new round with `prompt`.
    pub(crate) fn begin_round(&mut self, prompt: String) {
        self.results = None;
        for player in &mut self.players {
            player.answers = None;
        }
        self.prompt_history.push(prompt.clone());
        self.prompt = Some(prompt);
        self.transition(Phase::Prompt);
        self.bump();
    }

    /// Records a player's answers for the current round, replacing any
    /// earlier submission. Blank entries are dropped; an empty list still
    /// counts as having submitted.
    ///
    /// Returns `true` when every current player has now submitted.
    pub(crate) fn record_answers(
        &mut self,
        id: &PlayerId,
        answers: Vec<String>,
    ) -> Result<bool, Rejection> {
        if !self.phase.is_collecting() {
            return Err(Rejection::WrongPhase {
                required: Phase::Prompt,
                actual: self.phase,
            });
        }
        let player = self
            .player_mut(id)
            .ok_or_else(|| Rejection::UnknownPlayer(id.clone()))?;

        player.answers = Some(
            answers
                .into_iter()
                .map(|answer| answer.trim().to_string())
                .filter(|answer| !answer.is_empty())
                .collect(),
        );
        self.bump();
        Ok(self.all_answered())
    }

    /// `true` if every current player has a submission on record.
    pub(crate) fn all_answered(&self) -> bool {
        self.players.iter().all(|p| p.answers.is_some())
    }

    /// Every submitted answer, roster order then per-player order.
    pub(crate) fn submitted_answers(&self) -> Vec<String> {
        self.players
            .iter()
            .flat_map(|p| p.answers.iter().flatten().cloned())
            .collect()
    }

    /// Commits an evaluation: scores, hive levels, results, phase, and
    /// finally clears every submission.
    pub(crate) fn apply_round(&mut self, clusters: &[Cluster]) -> RoundSummary {
        for player in &mut self.players {
            let answers = player.answers.as_deref().unwrap_or_default();
            player.score = scoring::score_answers(answers, clusters);
        }

        let views = scoring::cluster_views(
            clusters,
            self.players.iter().map(|p| {
                (p.name.as_str(), p.answers.as_deref().unwrap_or_default())
            }),
        );

        let scores: Vec<u32> = self.players.iter().map(|p| p.score).collect();
        let lowest_score = scores.iter().copied().min();
        let mut losers = Vec::new();
        let mut eliminated = false;
        for index in scoring::lowest_scorers(&scores) {
            let player = &mut self.players[index];
            player.hive_level -= 1;
            losers.push(player.name.clone());
            eliminated |= player.hive_level < 1;
        }

        let loser_count = losers.len();
        self.results = Some(RoundResults {
            clusters: views,
            losers,
        });
        self.transition(if eliminated { Phase::Ended } else { Phase::Results });

        for player in &mut self.players {
            player.answers = None;
        }
        self.bump();

        RoundSummary {
            phase: self.phase,
            lowest_score,
            losers: loser_count,
        }
    }

    // -- Reads -------------------------------------------------------------

    /// A copy of the state for callers. While answers are being collected,
    /// nobody's answers are visible.
    pub(crate) fn snapshot(&self) -> GameStateView {
        let redact = self.phase.is_collecting();
        GameStateView {
            room_id: self.room_id.clone(),
            phase: self.phase,
            theme: self.theme.clone(),
            prompt: self.prompt.clone(),
            prompt_history: self.prompt_history.clone(),
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    profile: p.profile.clone(),
                    is_host: p.is_host,
                    hive_level: p.hive_level,
                    score: p.score,
                    answers: if redact { None } else { p.answers.clone() },
                })
                .collect(),
            version: self.version,
            results: self.results.clone(),
        }
    }
}
