use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::corpus::Corpus;
use crate::document::parser::Verse;
use crate::error::CorpusError;
use crate::index::WordEntry;
use crate::preprocessing::tokenizer;

/// Input words split by whether the corpus knows them. Both lists follow the
/// order in which words first appear in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification<'c> {
    pub matched: Vec<&'c WordEntry>,
    pub unmatched: Vec<String>,
}

impl Classification<'_> {
    pub fn total(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }

    pub fn coverage(&self) -> f64 {
        coverage_percentage(self)
    }
}

pub fn classify<'c>(input: &str, corpus: &'c Corpus) -> Classification<'c> {
    let mut matched = Vec::new();
    let mut unmatched = Vec::new();

    for token in tokenizer::unique_words_in_order(input) {
        match corpus.lookup(&token) {
            Some(entry) => matched.push(entry),
            None => unmatched.push(token),
        }
    }

    Classification { matched, unmatched }
}

/// Share of distinct input words found in the corpus, 0 to 100. Empty input gives 0.
pub fn coverage_percentage(result: &Classification<'_>) -> f64 {
    let total = result.total();
    if total == 0 {
        return 0.0;
    }
    100.0 * result.matched.len() as f64 / total as f64
}

/// Verses containing `entry`, in corpus order. Fails only if the entry holds an id
/// from a different corpus.
pub fn verses_for<'c>(entry: &WordEntry, corpus: &'c Corpus) -> Result<Vec<&'c Verse>, CorpusError> {
    entry.verse_ids.iter().map(|id| corpus.verse(id)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment<'t> {
    pub text: &'t str,
    pub is_match: bool,
}

/// Whole-word, ASCII case-insensitive matcher for one word. Build it once and
/// reuse it for every verse the word is shown in.
#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Option<Regex>,
}

impl Highlighter {
    pub fn new(word: &str) -> Self {
        Self {
            pattern: word_pattern(word),
        }
    }

    /// Splits `text` into runs, flagging occurrences of the word. A match must not
    /// have a letter directly before or after it.
    pub fn segments<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let mut segments = Vec::new();
        let mut last = 0;

        if let Some(pattern) = &self.pattern {
            for found in pattern.find_iter(text) {
                if !is_whole_word(text, found.start(), found.end()) {
                    continue;
                }
                if found.start() > last {
                    segments.push(Segment {
                        text: &text[last..found.start()],
                        is_match: false,
                    });
                }
                segments.push(Segment {
                    text: found.as_str(),
                    is_match: true,
                });
                last = found.end();
            }
        }

        if last < text.len() {
            segments.push(Segment {
                text: &text[last..],
                is_match: false,
            });
        }
        segments
    }

    /// Wraps every occurrence in `open`/`close`.
    pub fn occurrences(&self, text: &str, open: &str, close: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for segment in self.segments(text) {
            if segment.is_match {
                out.push_str(open);
                out.push_str(segment.text);
                out.push_str(close);
            } else {
                out.push_str(segment.text);
            }
        }
        out
    }

    /// HTML rendering: text is escaped, matches are in `<strong>`.
    pub fn html(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for segment in self.segments(text) {
            if segment.is_match {
                out.push_str("<strong>");
                escape_html_into(segment.text, &mut out);
                out.push_str("</strong>");
            } else {
                escape_html_into(segment.text, &mut out);
            }
        }
        out
    }
}

/// One-off form of [`Highlighter::segments`].
pub fn highlight_segments<'t>(text: &'t str, word: &str) -> Vec<Segment<'t>> {
    Highlighter::new(word).segments(text)
}

/// One-off form of [`Highlighter::occurrences`].
pub fn highlight_occurrences(text: &str, word: &str, open: &str, close: &str) -> String {
    Highlighter::new(word).occurrences(text, open, close)
}

/// One-off form of [`Highlighter::html`].
pub fn highlight_html(text: &str, word: &str) -> String {
    Highlighter::new(word).html(text)
}

// Tokens are ASCII, so case folding stays ASCII: `is` must not match `iſ`.
fn word_pattern(word: &str) -> Option<Regex> {
    if word.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(word))
        .case_insensitive(true)
        .unicode(false)
        .build()
        .ok()
}

fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphabetic) && !after.is_some_and(char::is_alphabetic)
}

fn escape_html_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
