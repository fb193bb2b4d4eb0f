use std::collections::{BTreeSet, HashSet};

/// Normalizes one whitespace-separated fragment: keeps ASCII letters only, lowercased.
/// Returns `None` when nothing is left.
pub fn normalize(fragment: &str) -> Option<String> {
    let token: String = fragment
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if token.is_empty() { None } else { Some(token) }
}

/// Every token of `text` in reading order, repeats kept.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().filter_map(normalize)
}

/// The set of distinct tokens in `text`.
pub fn extract_unique_words(text: &str) -> BTreeSet<String> {
    tokenize(text).collect()
}

/// Distinct tokens of `text`, in the order they first appear.
pub fn unique_words_in_order(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .filter(|token| seen.insert(token.clone()))
        .collect()
}
