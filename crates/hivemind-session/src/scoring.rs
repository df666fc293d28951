//! Round scoring: pure functions from answers + clusters to points.
//!
//! Matching is by exact literal string. An answer scores the size of the
//! first cluster that lists it verbatim; anything the collaborator left
//! out scores nothing. Case, whitespace and "close enough" spellings are
//! the collaborator's job, not ours.

use std::collections::{HashMap, HashSet};

use hivemind_protocol::{AnswerView, Cluster, ClusterView};

/// Points earned by one player's answers.
///
/// Two players submitting the same string each get full credit; scoring
/// never looks at who else said it.
pub fn score_answers(answers: &[String], clusters: &[Cluster]) -> u32 {
    answers
        .iter()
        .map(|answer| cluster_size_for(answer, clusters))
        .sum()
}

fn cluster_size_for(answer: &str, clusters: &[Cluster]) -> u32 {
    clusters
        .iter()
        .find(|cluster| cluster.answers.iter().any(|member| member == answer))
        .map(|cluster| u32::try_from(cluster.answers.len()).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// Indexes of every entry equal to the minimum. Empty input yields an
/// empty result.
pub fn lowest_scorers(scores: &[u32]) -> Vec<usize> {
    let Some(lowest) = scores.iter().copied().min() else {
        return Vec::new();
    };
    scores
        .iter()
        .enumerate()
        .filter(|(_, score)| **score == lowest)
        .map(|(index, _)| index)
        .collect()
}

/// Builds the presentation view of `clusters`: every member answer
/// annotated with the names of the players who submitted it.
///
/// `submissions` yields one `(player name, answers)` entry per player, in
/// roster order. Names need not be unique: two players called "Sam" who
/// both said "dog" are listed twice. This only decorates the results; it
/// has no effect on scores.
pub fn cluster_views<'a>(
    clusters: &[Cluster],
    submissions: impl IntoIterator<Item = (&'a str, &'a [String])>,
) -> Vec<ClusterView> {
    let mut players_by_answer: HashMap<&str, Vec<String>> = HashMap::new();
    for (name, answers) in submissions {
        // The same player listing an answer twice is still one player.
        let mut seen = HashSet::new();
        for answer in answers {
            if seen.insert(answer.as_str()) {
                players_by_answer
                    .entry(answer.as_str())
                    .or_default()
                    .push(name.to_string());
            }
        }
    }

    clusters
        .iter()
        .map(|cluster| ClusterView {
            cluster_name: cluster.cluster_name.clone(),
            answers: cluster
                .answers
                .iter()
                .map(|answer| AnswerView {
                    answer: answer.clone(),
                    players: players_by_answer
                        .get(answer.as_str())
                        .cloned()
                        .unwrap_or_default(),
                })
                .collect(),
        })
        .collect()
}
