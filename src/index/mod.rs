use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::document::parser::{Verse, VerseId};
use crate::preprocessing::tokenizer;

/// Everything the index knows about one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordEntry {
    pub token: String,
    /// Distinct verses containing the token, in corpus order.
    pub verse_ids: BTreeSet<VerseId>,
    /// Occurrences across all verses, repeats within a verse included.
    pub count: usize,
}

impl WordEntry {
    fn new(token: String, verse_id: VerseId) -> Self {
        Self {
            token,
            verse_ids: BTreeSet::from([verse_id]),
            count: 1,
        }
    }

    pub fn record(&mut self, verse_id: VerseId) {
        self.verse_ids.insert(verse_id);
        self.count += 1;
    }

    pub fn verse_count(&self) -> usize {
        self.verse_ids.len()
    }

    /// One-line description for result listings.
    pub fn summary(&self) -> String {
        format!("\"{}\" appears in {} verses", self.token, self.verse_count())
    }
}

/// Token -> entry mapping built in one pass over a corpus.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    entries: HashMap<String, WordEntry>,
}

impl WordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every token of every verse.
    pub fn build(verses: &[Verse]) -> Self {
        let mut index = Self::new();
        for verse in verses {
            for token in tokenizer::tokenize(&verse.text) {
                index.record_occurrence(token, &verse.id);
            }
        }
        index
    }

    pub fn record_occurrence(&mut self, token: String, verse_id: &VerseId) {
        match self.entries.get_mut(&token) {
            Some(entry) => entry.record(verse_id.clone()),
            None => {
                let entry = WordEntry::new(token.clone(), verse_id.clone());
                self.entries.insert(token, entry);
            }
        }
    }

    pub fn lookup(&self, token: &str) -> Option<&WordEntry> {
        self.entries.get(token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordEntry> {
        self.entries.values()
    }

    /// Entries by count descending, ties broken by token.
    fn ranked(&self) -> Vec<&WordEntry> {
        let mut ranked: Vec<&WordEntry> = self.entries.values().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.token.cmp(&b.token)));
        ranked
    }

    pub fn most_common(&self, n: usize) -> Vec<&WordEntry> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    /// The `n` rarest entries, still in descending order.
    pub fn least_common(&self, n: usize) -> Vec<&WordEntry> {
        let ranked = self.ranked();
        let skip = ranked.len().saturating_sub(n);
        ranked.into_iter().skip(skip).collect()
    }

    /// Entries with `min <= count <= max`, most common first.
    pub fn with_count_between(&self, min: usize, max: usize) -> Vec<&WordEntry> {
        self.ranked()
            .into_iter()
            .filter(|entry| (min..=max).contains(&entry.count))
            .collect()
    }
}
