//! Integration tests for the room registry.

use std::collections::HashSet;
use std::sync::Arc;

use hivemind_llm::{CompletionError, TextCompleter};
use hivemind_protocol::{Phase, PlayerId, RoomId};
use hivemind_room::{RegistryConfig, RoomError, RoomRegistry};
use hivemind_session::{SessionConfig, SessionError};

// =========================================================================
// Helpers
// =========================================================================

/// Always proposes the same prompt.
struct FixedPrompt;

impl TextCompleter for FixedPrompt {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Ok("Name something yellow".into())
    }
}

fn registry(code_digits: u32) -> RoomRegistry<FixedPrompt> {
    RoomRegistry::new(
        Arc::new(FixedPrompt),
        SessionConfig::default(),
        RegistryConfig { code_digits },
    )
}

// =========================================================================
// create_session()
// =========================================================================

#[tokio::test]
async fn test_create_session_thousand_distinct_eight_digit_codes() {
    let registry = registry(8);
    let mut seen = HashSet::new();

    for _ in 0..1000 {
        let (room_id, _) = registry.create_session("colors").await.unwrap();
        assert_eq!(room_id.as_str().len(), 8);
        assert!(room_id.as_str().chars().all(|c| c.is_ascii_digit()));
        assert!(seen.insert(room_id));
    }

    assert_eq!(registry.room_count().await, 1000);
}

#[tokio::test]
async fn test_create_session_seeds_theme_and_lobby() {
    let registry = registry(8);
    let (room_id, handle) = registry.create_session("colors").await.unwrap();

    assert_eq!(handle.room_id(), &room_id);
    let view = handle.snapshot().await.unwrap();
    assert_eq!(view.room_id, room_id);
    assert_eq!(view.theme, "colors");
    assert_eq!(view.phase, Phase::Lobby);
    assert!(view.players.is_empty());
    assert_eq!(view.version, 0);
}

#[tokio::test]
async fn test_create_session_exhausted_creates_nothing() {
    let registry = registry(1);

    let mut seen = HashSet::new();
    for _ in 0..10 {
        let (room_id, _) = registry.create_session("t").await.unwrap();
        seen.insert(room_id);
    }
    assert_eq!(seen.len(), 10);

    let err = registry.create_session("t").await;
    assert!(matches!(err, Err(RoomError::Exhausted { capacity: 10 })));
    assert_eq!(registry.room_count().await, 10);
}

#[tokio::test]
async fn test_create_session_reuses_freed_code() {
    let registry = registry(1);
    let mut ids = Vec::new();
    for _ in 0..10 {
        ids.push(registry.create_session("t").await.unwrap().0);
    }

    registry.remove_session(&ids[3]).await.unwrap();
    let (room_id, _) = registry.create_session("t").await.unwrap();
    assert_eq!(room_id, ids[3]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_create_session_concurrent_callers_get_distinct_codes() {
    let registry = Arc::new(registry(2));

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry.create_session("t").await.unwrap().0
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for task in tasks {
        assert!(seen.insert(task.await.unwrap()));
    }
    assert_eq!(registry.room_count().await, 50);
}

// =========================================================================
// get_session() / remove_session()
// =========================================================================

#[tokio::test]
async fn test_get_session_unknown_code_not_found() {
    let registry = registry(8);
    let missing = RoomId::from_code(7, 8);

    let err = registry.get_session(&missing).await;
    assert!(matches!(err, Err(RoomError::NotFound(id)) if id == missing));
}

#[tokio::test]
async fn test_get_session_returns_same_room() {
    let registry = registry(8);
    let (room_id, handle) = registry.create_session("colors").await.unwrap();

    handle
        .add_player(PlayerId::new("p1"), "Ada", None)
        .await
        .unwrap();

    let found = registry.get_session(&room_id).await.unwrap();
    let view = found.snapshot().await.unwrap();
    assert_eq!(view.players.len(), 1);
    assert!(view.players[0].is_host);
}

#[tokio::test]
async fn test_remove_session_stops_room() {
    let registry = registry(8);
    let (room_id, handle) = registry.create_session("colors").await.unwrap();

    registry.remove_session(&room_id).await.unwrap();

    assert_eq!(registry.room_count().await, 0);
    assert!(registry.room_ids().await.is_empty());
    assert!(matches!(
        registry.get_session(&room_id).await,
        Err(RoomError::NotFound(_))
    ));
    assert!(matches!(
        handle.snapshot().await,
        Err(SessionError::Unavailable(_))
    ));

    assert!(matches!(
        registry.remove_session(&room_id).await,
        Err(RoomError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_room_ids_lists_every_room() {
    let registry = registry(8);
    let (a, _) = registry.create_session("a").await.unwrap();
    let (b, _) = registry.create_session("b").await.unwrap();

    let ids: HashSet<RoomId> = registry.room_ids().await.into_iter().collect();
    assert_eq!(ids, HashSet::from([a, b]));
}
