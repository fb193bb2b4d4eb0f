use std::path::PathBuf;

use thiserror::Error;

/// What was wrong with a line of corpus text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("missing version label on line 2")]
    MissingVersionLabel,

    #[error("no tab between reference and verse text")]
    MissingTab,

    #[error("reference has no book name before chapter:verse")]
    MissingReference,

    #[error("reference has no ':' between chapter and verse")]
    MissingColon,

    #[error("{field} number {value:?} is not a positive integer")]
    InvalidNumber { field: &'static str, value: String },
}

/// A corpus text that could not be parsed. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind} ({content:?})")]
pub struct ParseError {
    pub line: usize,
    pub content: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, content: &str, kind: ParseErrorKind) -> Self {
        Self {
            line,
            content: content.to_string(),
            kind,
        }
    }
}

/// Invariant violations when resolving index data against a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorpusError {
    #[error("verse index {index} is out of range for a corpus of {len} verses")]
    VerseOutOfRange { index: usize, len: usize },

    #[error("verse id {id} does not belong to this corpus")]
    ForeignVerse { id: String },
}

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("version {0:?} is loaded more than once")]
    DuplicateVersion(String),

    #[error("unknown version {0:?}")]
    UnknownVersion(String),

    #[error("no corpus files found in {}", .0.display())]
    Empty(PathBuf),

    #[error("a corpus library needs at least one corpus")]
    NoCorpora,
}
