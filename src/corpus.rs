use tracing::info;

use crate::document::parser::{Verse, VerseId, parse_corpus_text};
use crate::error::{CorpusError, ParseError};
use crate::index::{WordEntry, WordIndex};

/// One loaded edition: its verses in source order plus the word index over them.
/// Read-only once built.
#[derive(Debug, Clone)]
pub struct Corpus {
    version_label: String,
    verses: Vec<Verse>,
    word_index: WordIndex,
}

impl Corpus {
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let (version_label, verses) = parse_corpus_text(content)?;
        let corpus = Self::from_verses(version_label, verses);

        info!(
            version = %corpus.version_label,
            verses = corpus.verses.len(),
            vocabulary = corpus.word_index.len(),
            "corpus indexed"
        );
        Ok(corpus)
    }

    pub fn from_verses(version_label: String, verses: Vec<Verse>) -> Self {
        let word_index = WordIndex::build(&verses);
        Self {
            version_label,
            verses,
            word_index,
        }
    }

    pub fn version_label(&self) -> &str {
        &self.version_label
    }

    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    pub fn word_index(&self) -> &WordIndex {
        &self.word_index
    }

    pub fn lookup(&self, token: &str) -> Option<&WordEntry> {
        self.word_index.lookup(token)
    }

    /// Resolves an id against this corpus, checking that it actually came from here.
    pub fn verse(&self, id: &VerseId) -> Result<&Verse, CorpusError> {
        let verse = self.verses.get(id.index).ok_or(CorpusError::VerseOutOfRange {
            index: id.index,
            len: self.verses.len(),
        })?;

        if verse.id != *id {
            return Err(CorpusError::ForeignVerse { id: id.to_string() });
        }
        Ok(verse)
    }
}
