//! Text normalization shared by the resolution strategies.

/// Words that carry no identifying signal in a target description.
const FILLER_WORDS: &[&str] = &[
    "the", "a", "an", "on", "in", "at", "to", "of", "for", "with", "and", "or", "this", "that",
    "called", "named", "labeled", "labelled", "which", "says", "saying", "element", "page",
];

/// Collapse runs of whitespace into single spaces and trim.
pub(crate) fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase alphanumerics only: `"Log In!"` becomes `"login"`.
pub(crate) fn compact(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercase alphanumeric words.
pub(crate) fn words(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

pub(crate) fn is_filler(word: &str) -> bool {
    FILLER_WORDS.contains(&word)
}

/// Substring test on compacted strings, in either direction.
///
/// The reverse direction (needle inside haystack's description) only counts
/// when the shorter side has at least `min_reverse` characters.
pub(crate) fn compact_overlap(a: &str, b: &str, min_reverse: usize) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || (a.chars().count() >= min_reverse && b.contains(a))
}
