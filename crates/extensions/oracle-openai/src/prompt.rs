//! Prompt construction for element matching.

use stepwise_protocols::MatchRequest;

pub const SYSTEM_PROMPT: &str = "You match a natural-language description of a web page element \
to one entry in a numbered list of candidate elements. \
Reply with a single JSON object and nothing else: \
{\"index\": <candidate number>, \"confidence\": \"high\" | \"medium\" | \"low\", \"rationale\": \"<one short sentence>\"}. \
Prefer visible elements whose role suits the requested action. \
If no candidate fits, pick the closest one and answer with confidence \"low\".";

/// User message: the page context, the action, the description and the candidates as JSON lines.
pub fn user_prompt(request: &MatchRequest) -> String {
    let mut prompt = format!(
        "Page: {} ({})\nAction: {}\nDescription: {}\n\nCandidates:\n",
        if request.page_title.is_empty() {
            "untitled"
        } else {
            request.page_title.as_str()
        },
        request.page_url,
        request.action,
        request.description,
    );
    for candidate in &request.candidates {
        let line = serde_json::to_string(candidate).unwrap_or_default();
        prompt.push_str(&line);
        prompt.push('\n');
    }
    prompt
}
