//! Deterministic resolution strategies, cheapest first.

use regex::Regex;

use stepwise_protocols::{ActionKind, Confidence, ElementInfo, PageSnapshot, Strategy};

use super::text::{collapse, compact, compact_overlap, is_filler, words};

/// Minimum compacted length for a label found inside the description.
const MIN_REVERSE_MATCH: usize = 3;

/// Strategies in evaluation order with their base confidence.
const CASCADE: [(Strategy, Confidence); 5] = [
    (Strategy::ExactText, Confidence::High),
    (Strategy::PartialText, Confidence::Medium),
    (Strategy::AriaLabel, Confidence::High),
    (Strategy::Placeholder, Confidence::Medium),
    (Strategy::RoleTextCombo, Confidence::Medium),
];

/// First deterministic hit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CascadeHit<'a> {
    pub element: &'a ElementInfo,
    pub strategy: Strategy,
    pub confidence: Confidence,
    /// Number of elements the winning strategy matched.
    pub matched: usize,
}

/// Precomputed views of one description.
struct Query {
    raw: String,
    compact: String,
    words: Vec<String>,
    pattern: Option<Regex>,
}

impl Query {
    fn new(description: &str) -> Self {
        let raw = collapse(description);
        let pattern = {
            let parts: Vec<String> = raw.split(' ').map(regex::escape).collect();
            Regex::new(&format!("(?i){}", parts.join(r"\s+"))).ok()
        };
        Self {
            compact: compact(&raw),
            words: words(&raw),
            pattern,
            raw,
        }
    }
}

/// Run strategies in order; the first one with any match wins.
///
/// Within a strategy the first visible element in DOM order is picked, and
/// more than one match lowers the confidence by one tier.
pub(crate) fn run<'a>(
    description: &str,
    action: ActionKind,
    snapshot: &'a PageSnapshot,
) -> Option<CascadeHit<'a>> {
    let query = Query::new(description);
    if query.raw.is_empty() {
        return None;
    }

    for (strategy, base) in CASCADE {
        if strategy == Strategy::Placeholder && !action.is_text_entry() {
            continue;
        }

        let matches: Vec<&ElementInfo> = snapshot
            .elements
            .iter()
            .filter(|el| matches_strategy(strategy, &query, el))
            .collect();

        let Some(element) = matches
            .iter()
            .copied()
            .min_by_key(|el| (!el.visible, el.index))
        else {
            continue;
        };

        let confidence = if matches.len() > 1 { base.lowered() } else { base };
        return Some(CascadeHit {
            element,
            strategy,
            confidence,
            matched: matches.len(),
        });
    }

    None
}

fn matches_strategy(strategy: Strategy, query: &Query, el: &ElementInfo) -> bool {
    match strategy {
        Strategy::ExactText => exact_text(query, el),
        Strategy::PartialText => partial_text(query, el),
        Strategy::AriaLabel => el
            .accessible_label()
            .is_some_and(|label| compact_overlap(&compact(label), &query.compact, MIN_REVERSE_MATCH)),
        Strategy::Placeholder => el.placeholder().is_some_and(|placeholder| {
            compact_overlap(&compact(placeholder), &query.compact, MIN_REVERSE_MATCH)
        }),
        Strategy::RoleTextCombo => role_text_combo(query, el),
        Strategy::Literal | Strategy::AiMatch => false,
    }
}

fn exact_text(query: &Query, el: &ElementInfo) -> bool {
    !el.text.is_empty() && collapse(&el.text).contains(&query.raw)
}

fn partial_text(query: &Query, el: &ElementInfo) -> bool {
    !el.text.trim().is_empty() && query.pattern.as_ref().is_some_and(|re| re.is_match(&el.text))
}

fn role_text_combo(query: &Query, el: &ElementInfo) -> bool {
    let text = compact(&el.text);
    if text.is_empty() {
        return false;
    }

    let role_words = role_words(el);
    if !query.words.iter().any(|w| role_words.contains(w)) {
        return false;
    }

    let residual: String = query
        .words
        .iter()
        .filter(|w| !role_words.contains(*w) && !is_filler(w))
        .map(String::as_str)
        .collect();

    !residual.is_empty() && text.contains(&residual)
}

/// Words a description may use to name this kind of element.
fn role_words(el: &ElementInfo) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    if let Some(role) = el.effective_role() {
        let synonyms: &[&str] = match role.as_str() {
            "button" => &["button", "btn"],
            "link" => &["link", "anchor"],
            "textbox" => &["field", "input", "textbox", "box"],
            "combobox" => &["dropdown", "select", "combobox"],
            "img" => &["image", "img", "icon"],
            _ => &[],
        };
        out.extend(synonyms.iter().map(|s| s.to_string()));
        out.push(role);
    }
    if el.tag.len() > 1 && !is_filler(&el.tag) {
        out.push(el.tag.clone());
    }
    out
}

#[cfg(test)]
#[path = "cascade_tests.rs"]
mod tests;
