//! Requests sent to the text-generation collaborator, and parsing of the
//! clustering reply.

use hivemind_protocol::{Cluster, Codec, ProtocolError};

/// Builds the request that asks for the next round's question.
///
/// Every earlier prompt is listed so the model steers away from repeats.
pub fn prompt_request(theme: &str, history: &[String]) -> String {
    let mut request = format!(
        "You are writing a single, short prompt for a party word-association game. \
         The prompt must be based on the theme: {theme}. "
    );
    if !history.is_empty() {
        request.push_str(&format!(
            "Do not repeat or closely match these previous prompts: {}. ",
            history.join(" | ")
        ));
    }
    request.push_str(
        "Write ONE clear, concrete question that asks players to list 3 answers. \
         Keep it simple, everyday, and specific enough to spark variety. \
         Do not include examples, explanations, or extra text. \
         Avoid repeating common or generic prompts.",
    );
    request
}

/// Builds the request that asks the collaborator to group `answers`.
///
/// The answers are embedded as a JSON array so commas or quotes inside
/// an answer can't blur the boundary between two answers.
pub fn clustering_request<C: Codec>(
    codec: &C,
    prompt: &str,
    answers: &[String],
) -> Result<String, ProtocolError> {
    let encoded = codec.encode(&answers)?;
    let answer_list = String::from_utf8_lossy(&encoded);
    Ok(format!(
        "Players are submitting answers to the prompt: {prompt} \
         Here are all of the answers as a JSON array: {answer_list}. \
         Your job is to group the answers that refer to the same idea into clusters. \
         Each answer can appear in at most one cluster; do not reuse an answer across clusters. \
         If an answer doesn't match any other answer, don't create a cluster for it. \
         Copy every answer into its cluster exactly as written above. \
         For each cluster, provide a short proper name and list the answers that belong to it. \
         Respond with only a JSON array of objects with the fields \"clusterName\" (string) \
         and \"answers\" (array of strings), and nothing else."
    ))
}

/// Decodes a clustering reply into clusters.
///
/// The reply must be a JSON array of [`Cluster`] objects, optionally
/// wrapped in one Markdown code fence. Anything else is an error; there
/// is no partial recovery.
pub fn parse_clusters<C: Codec>(
    codec: &C,
    raw: &str,
) -> Result<Vec<Cluster>, ProtocolError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(ProtocolError::InvalidMessage(
            "empty cluster payload".into(),
        ));
    }
    codec.decode(body.as_bytes())
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    // Drop an info string such as "json" on the opening fence line.
    match inner.split_once('\n') {
        Some((info, body)) if !info.contains(['[', '{']) => body.trim(),
        _ => inner.trim(),
    }
}
