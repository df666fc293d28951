//! Session actor: an isolated Tokio task that owns one room's game.
//!
//! Each session runs in its own task and talks to the outside world
//! through a bounded mpsc channel. The task handles one command at a
//! time, which gives us the whole concurrency story for free:
//!
//! - two mutations on the same room never interleave,
//! - a snapshot is always taken between two complete commands,
//! - a collaborator call made while handling a command holds the room
//!   until it returns or times out.
//!
//! Rooms never share a task or a lock, so a slow room only slows itself.

use std::sync::Arc;

use hivemind_llm::TextCompleter;
use hivemind_protocol::{
    GameStateView, JsonCodec, Phase, PlayerId, ProtocolError, RoomId,
};
use tokio::sync::{mpsc, oneshot};

use crate::state::GameState;
use crate::{SessionConfig, SessionError, prompts};

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

/// Commands sent to a session actor through its channel.
///
/// The `reply` in each variant is a one-shot channel the caller waits on
/// for the outcome.
pub(crate) enum SessionCommand {
    AddPlayer {
        id: PlayerId,
        name: String,
        profile: Option<String>,
        reply: Reply<()>,
    },
    RemovePlayer {
        id: PlayerId,
        reply: Reply<()>,
    },
    StartGame {
        requester: PlayerId,
        reply: Reply<()>,
    },
    SubmitAnswers {
        player: PlayerId,
        answers: Vec<String>,
        reply: Reply<()>,
    },
    NextRound {
        requester: PlayerId,
        reply: Reply<()>,
    },
    Snapshot {
        reply: Reply<GameStateView>,
    },
    Shutdown,
}

/// Handle to a running session. Used to send commands to it.
///
/// Cheap to clone: it's an `mpsc::Sender` plus the room id. Every
/// clone talks to the same room.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    room_id: RoomId,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Returns the room's id.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Returns `true` while the session task is still running.
    pub fn is_alive(&self) -> bool {
        !self.sender.is_closed()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| SessionError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.room_id.clone()))?
    }

    /// Adds a player to the room. Legal in every phase.
    ///
    /// `profile` falls back to the configured default when `None` or
    /// blank.
    ///
    /// # Errors
    /// [`Rejection::DuplicatePlayer`](crate::Rejection::DuplicatePlayer)
    /// if `id` already joined, or
    /// [`Rejection::BlankName`](crate::Rejection::BlankName).
    pub async fn add_player(
        &self,
        id: PlayerId,
        name: impl Into<String>,
        profile: Option<String>,
    ) -> Result<(), SessionError> {
        let name = name.into();
        self.request(|reply| SessionCommand::AddPlayer {
            id,
            name,
            profile,
            reply,
        })
        .await
    }

    /// Removes a player from the room. The host is never replaced.
    ///
    /// Leaving never closes a round. If the player removed during
    /// [`Phase::Prompt`] was the last one yet to submit, the round stays
    /// open until one of the remaining players submits again.
    pub async fn remove_player(&self, id: PlayerId) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::RemovePlayer { id, reply })
            .await
    }

    /// Starts the first round. Only the host, only from the lobby.
    ///
    /// Waits for the collaborator to write a prompt. If that fails the
    /// room stays in the lobby, untouched.
    pub async fn start_game(
        &self,
        requester: PlayerId,
    ) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::StartGame { requester, reply })
            .await
    }

    /// Records `answers` for `player` in the current round.
    ///
    /// If this completes the round (every current player has submitted),
    /// the round is evaluated before this returns. When that evaluation
    /// fails the submission stays recorded, the round stays open, and the
    /// error is returned; submitting again retries the evaluation.
    pub async fn submit_answers(
        &self,
        player: PlayerId,
        answers: Vec<String>,
    ) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::SubmitAnswers {
            player,
            answers,
            reply,
        })
        .await
    }

    /// Starts the next round. Only the host, only from results.
    pub async fn next_round(
        &self,
        requester: PlayerId,
    ) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::NextRound { requester, reply })
            .await
    }

    /// Returns a read-only copy of the room. Answers are hidden while a
    /// round is collecting them.
    pub async fn snapshot(&self) -> Result<GameStateView, SessionError> {
        self.request(|reply| SessionCommand::Snapshot { reply }).await
    }

    /// Tells the session to stop. Commands already queued are dropped.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.sender
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| SessionError::Unavailable(self.room_id.clone()))
    }
}

/// The internal session state. Runs inside a Tokio task.
struct SessionActor<C: TextCompleter> {
    state: GameState,
    config: SessionConfig,
    completer: Arc<C>,
    codec: JsonCodec,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl<C: TextCompleter> SessionActor<C> {
    /// Runs the actor loop, processing commands until shutdown or until
    /// every handle is dropped.
    async fn run(mut self) {
        tracing::info!(room_id = %self.state.room_id, "session started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::AddPlayer {
                    id,
                    name,
                    profile,
                    reply,
                } => {
                    let _ = reply.send(self.handle_add(id, name, profile));
                }
                SessionCommand::RemovePlayer { id, reply } => {
                    let _ = reply.send(self.handle_remove(id));
                }
                SessionCommand::StartGame { requester, reply } => {
                    let result =
                        self.handle_new_round(requester, Phase::Lobby).await;
                    let _ = reply.send(result);
                }
                SessionCommand::SubmitAnswers {
                    player,
                    answers,
                    reply,
                } => {
                    let result = self.handle_submit(player, answers).await;
                    let _ = reply.send(result);
                }
                SessionCommand::NextRound { requester, reply } => {
                    let result =
                        self.handle_new_round(requester, Phase::Results).await;
                    let _ = reply.send(result);
                }
                SessionCommand::Snapshot { reply } => {
                    let _ = reply.send(Ok(self.state.snapshot()));
                }
                SessionCommand::Shutdown => {
                    tracing::info!(room_id = %self.state.room_id, "session shutting down");
                    break;
                }
            }
        }

        tracing::info!(room_id = %self.state.room_id, "session stopped");
    }

    fn handle_add(
        &mut self,
        id: PlayerId,
        name: String,
        profile: Option<String>,
    ) -> Result<(), SessionError> {
        let name = name.trim().to_string();
        let profile = profile
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| self.config.default_profile.clone());

        let result = self.state.add_player(
            id.clone(),
            name,
            profile,
            self.config.starting_hive_level,
        );
        match result {
            Ok(()) => {
                tracing::info!(
                    room_id = %self.state.room_id,
                    player_id = %id,
                    players = self.state.players.len(),
                    "player joined"
                );
                Ok(())
            }
            Err(reason) => Err(self.rejected(reason)),
        }
    }

    fn handle_remove(&mut self, id: PlayerId) -> Result<(), SessionError> {
        match self.state.remove_player(&id) {
            Ok(()) => {
                tracing::info!(
                    room_id = %self.state.room_id,
                    player_id = %id,
                    players = self.state.players.len(),
                    "player left"
                );
                Ok(())
            }
            Err(reason) => Err(self.rejected(reason)),
        }
    }

    /// Shared by start-game (from `Lobby`) and next-round (from `Results`).
    async fn handle_new_round(
        &mut self,
        requester: PlayerId,
        required: Phase,
    ) -> Result<(), SessionError> {
        if let Err(reason) = self.state.ensure_host_in(&requester, required) {
            return Err(self.rejected(reason));
        }

        let request =
            prompts::prompt_request(&self.state.theme, &self.state.prompt_history);
        let reply = self.complete(&request).await?;
        let prompt = reply.trim();
        if prompt.is_empty() {
            return Err(SessionError::MalformedResponse(
                ProtocolError::InvalidMessage("empty prompt".into()),
            ));
        }

        self.state.begin_round(prompt.to_string());
        tracing::info!(
            room_id = %self.state.room_id,
            round = self.state.prompt_history.len(),
            prompt,
            "round started"
        );
        Ok(())
    }

    async fn handle_submit(
        &mut self,
        player: PlayerId,
        answers: Vec<String>,
    ) -> Result<(), SessionError> {
        let complete = match self.state.record_answers(&player, answers) {
            Ok(complete) => complete,
            Err(reason) => return Err(self.rejected(reason)),
        };
        tracing::debug!(
            room_id = %self.state.room_id,
            player_id = %player,
            "answers recorded"
        );

        if complete {
            self.evaluate_round().await?;
        }
        Ok(())
    }

    /// Asks the collaborator to cluster this round's answers and commits
    /// the outcome. Any failure returns before `state` is touched.
    async fn evaluate_round(&mut self) -> Result<(), SessionError> {
        let prompt = self.state.prompt.clone().unwrap_or_default();
        let answers = self.state.submitted_answers();
        let request = prompts::clustering_request(&self.codec, &prompt, &answers)?;

        let raw = self.complete(&request).await?;
        let clusters = prompts::parse_clusters(&self.codec, &raw).map_err(|e| {
            tracing::warn!(
                room_id = %self.state.room_id,
                error = %e,
                "cluster reply rejected, round stays open"
            );
            SessionError::MalformedResponse(e)
        })?;

        let summary = self.state.apply_round(&clusters);
        tracing::info!(
            room_id = %self.state.room_id,
            clusters = clusters.len(),
            lowest_score = ?summary.lowest_score,
            losers = summary.losers,
            phase = %summary.phase,
            "round evaluated"
        );
        if summary.phase.is_terminal() {
            tracing::info!(room_id = %self.state.room_id, "game ended");
        }
        Ok(())
    }

    /// One bounded collaborator call.
    async fn complete(&self, request: &str) -> Result<String, SessionError> {
        let timeout = self.config.completion_timeout;
        match tokio::time::timeout(timeout, self.completer.complete(request))
            .await
        {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                tracing::warn!(
                    room_id = %self.state.room_id,
                    error = %e,
                    "collaborator call failed"
                );
                Err(SessionError::Completion(e))
            }
            Err(_) => {
                tracing::warn!(
                    room_id = %self.state.room_id,
                    ?timeout,
                    "collaborator call timed out"
                );
                Err(SessionError::Timeout(timeout))
            }
        }
    }

    fn rejected(&self, reason: crate::Rejection) -> SessionError {
        tracing::debug!(
            room_id = %self.state.room_id,
            %reason,
            "request rejected"
        );
        SessionError::Rejected(reason)
    }
}

/// Spawns a new session task for `room_id` and returns a handle to it.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_session<C: TextCompleter>(
    room_id: RoomId,
    theme: impl Into<String>,
    config: SessionConfig,
    completer: Arc<C>,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));

    let actor = SessionActor {
        state: GameState::new(room_id.clone(), theme.into()),
        config,
        completer,
        codec: JsonCodec,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    SessionHandle {
        room_id,
        sender: tx,
    }
}
