//! Checks which words of a passage occur in a scripture text and finds the
//! verses that contain them.

pub mod config;
pub mod corpus;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod library;
pub mod preprocessing;
pub mod server;

pub use corpus::Corpus;
pub use document::parser::{Verse, VerseId};
pub use engine::search::{Classification, Highlighter, classify, coverage_percentage, highlight_occurrences, verses_for};
pub use index::{WordEntry, WordIndex};
pub use library::CorpusLibrary;
