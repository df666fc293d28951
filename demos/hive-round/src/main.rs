//! Plays a complete Hivemind game between three bots.
//!
//! With `HIVEMIND_LLM_URL`, `HIVEMIND_LLM_API_KEY` and `HIVEMIND_LLM_MODEL`
//! set, prompts and clusters come from that chat-completions endpoint.
//! Otherwise an offline judge stands in: it cycles through canned prompts
//! and clusters answers that match ignoring case.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use hivemind::prelude::*;
use serde_json::json;

// ---------------------------------------------------------------------------
// Offline judge
// ---------------------------------------------------------------------------

const CANNED_PROMPTS: &[&str] = &[
    "Name something you eat for breakfast",
    "Name a fruit you'd put in a smoothie",
    "Name a color you'd paint a front door",
];

struct OfflineJudge {
    prompts_served: AtomicUsize,
}

impl OfflineJudge {
    fn new() -> Self {
        Self {
            prompts_served: AtomicUsize::new(0),
        }
    }

    fn next_prompt(&self) -> String {
        let n = self.prompts_served.fetch_add(1, Ordering::Relaxed);
        CANNED_PROMPTS[n % CANNED_PROMPTS.len()].to_string()
    }

    /// Groups the answers embedded in a clustering request by their
    /// lowercase form. Singletons are left out.
    fn cluster(&self, request: &str) -> Result<String, CompletionError> {
        let answers = request
            .split_once("JSON array: ")
            .and_then(|(_, rest)| {
                serde_json::Deserializer::from_str(rest)
                    .into_iter::<Vec<String>>()
                    .next()
            })
            .and_then(Result::ok)
            .ok_or_else(|| {
                CompletionError::Failed("no answer list in request".into())
            })?;

        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<String>> = HashMap::new();
        for answer in answers {
            let key = answer.to_lowercase();
            if !groups.contains_key(&key) {
                order.push(key.clone());
            }
            groups.entry(key).or_default().push(answer);
        }

        let clusters: Vec<_> = order
            .into_iter()
            .filter_map(|key| {
                let members = groups.remove(&key)?;
                (members.len() > 1).then(|| {
                    json!({ "clusterName": key, "answers": members })
                })
            })
            .collect();
        Ok(serde_json::Value::Array(clusters).to_string())
    }
}

impl TextCompleter for OfflineJudge {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        if prompt.contains("\"clusterName\"") {
            self.cluster(prompt)
        } else {
            Ok(self.next_prompt())
        }
    }
}

// ---------------------------------------------------------------------------
// Bots
// ---------------------------------------------------------------------------

struct Bot {
    id: &'static str,
    name: &'static str,
    profile: Option<&'static str>,
    /// One answer list per canned prompt.
    answers: [[&'static str; 3]; 3],
}

const BOTS: [Bot; 3] = [
    Bot {
        id: "p1",
        name: "Ada",
        profile: None,
        answers: [
            ["pancakes", "coffee", "eggs"],
            ["banana", "strawberry", "mango"],
            ["red", "blue", "green"],
        ],
    },
    Bot {
        id: "p2",
        name: "Bo",
        profile: Some("Worker Bee"),
        answers: [
            ["Eggs", "toast", "coffee"],
            ["banana", "blueberry", "Strawberry"],
            ["blue", "red", "yellow"],
        ],
    },
    Bot {
        id: "p3",
        name: "Cy",
        profile: Some("Drone"),
        answers: [
            ["kippers", "porridge", "coffee"],
            ["durian", "lychee", "banana"],
            ["teal", "ochre", "mauve"],
        ],
    },
];

const MAX_ROUNDS: usize = 12;

async fn play<C: TextCompleter>(hive: Hivemind<C>) -> Result<(), HivemindError> {
    let (room_id, room) = hive.create_room("everyday life").await?;
    println!("room {room_id} created");

    for bot in &BOTS {
        room.add_player(
            PlayerId::new(bot.id),
            bot.name,
            bot.profile.map(str::to_string),
        )
        .await?;
    }
    let host = PlayerId::new(BOTS[0].id);
    room.start_game(host.clone()).await?;

    for round in 0..MAX_ROUNDS {
        let view = room.snapshot().await?;
        println!(
            "\nround {}: {}",
            round + 1,
            view.prompt.as_deref().unwrap_or_default()
        );

        for bot in &BOTS {
            let answers = bot.answers[round % 3].map(str::to_string).to_vec();
            room.submit_answers(PlayerId::new(bot.id), answers).await?;
        }

        let view = room.snapshot().await?;
        for player in &view.players {
            println!(
                "  {:<4} score {:>2}  hive {}",
                player.name, player.score, player.hive_level
            );
        }
        if let Some(results) = &view.results {
            println!("  lowest: {}", results.losers.join(", "));
        }

        if view.phase == Phase::Ended {
            println!("\ngame over after {} rounds", view.prompt_history.len());
            break;
        }
        room.next_round(host.clone()).await?;
    }

    let view = room.snapshot().await?;
    tracing::debug!(
        version = view.version,
        rounds = view.prompt_history.len(),
        "final state"
    );
    match serde_json::to_string_pretty(&view) {
        Ok(text) => println!("\n{text}"),
        Err(e) => eprintln!("could not render final state: {e}"),
    }

    hive.remove_room(&room_id).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    hivemind::init_tracing();

    if std::env::var_os(hivemind::llm::ENV_BASE_URL).is_some() {
        eprintln!("using chat-completions endpoint from the environment");
        play(HivemindBuilder::new().build_from_env()?).await?;
    } else {
        eprintln!("no {} set, using the offline judge", hivemind::llm::ENV_BASE_URL);
        play(HivemindBuilder::new().build(OfflineJudge::new())).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use hivemind::session::prompts;

    use super::*;

    #[test]
    fn test_offline_judge_groups_case_insensitively() {
        let judge = OfflineJudge::new();
        let answers = vec![
            "Eggs".to_string(),
            "toast".to_string(),
            "eggs".to_string(),
        ];
        let request = prompts::clustering_request(
            &hivemind::protocol::JsonCodec,
            "Name a breakfast food",
            &answers,
        )
        .unwrap();

        let reply = judge.cluster(&request).unwrap();
        let clusters: Vec<Cluster> = serde_json::from_str(&reply).unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].cluster_name, "eggs");
        assert_eq!(clusters[0].answers, vec!["Eggs", "eggs"]);
    }

    #[test]
    fn test_offline_judge_cycles_prompts() {
        let judge = OfflineJudge::new();
        let first = judge.next_prompt();
        judge.next_prompt();
        judge.next_prompt();
        assert_eq!(judge.next_prompt(), first);
    }

    #[tokio::test]
    async fn test_play_runs_to_completion_offline() {
        let hive = HivemindBuilder::new().build(OfflineJudge::new());
        play(hive.clone()).await.unwrap();
        assert_eq!(hive.room_count().await, 0);
    }
}
