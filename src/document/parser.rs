use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::error::{ParseError, ParseErrorKind};

/// Number of lines before the first verse: a format marker and the version label.
pub const HEADER_LINES: usize = 2;

/// Identifies a verse by reference and by its position in the corpus it came from.
/// `index` is only meaningful together with that corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VerseId {
    pub book_name: String,
    pub chapter_num: u32,
    pub verse_num: u32,
    pub index: usize,
}

impl VerseId {
    pub fn new(book_name: &str, chapter_num: u32, verse_num: u32, index: usize) -> Self {
        Self {
            book_name: book_name.to_string(),
            chapter_num,
            verse_num,
            index,
        }
    }
}

// Corpus order first, so sets of ids iterate in reading order.
impl Ord for VerseId {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.index, &self.book_name, self.chapter_num, self.verse_num).cmp(&(
            other.index,
            &other.book_name,
            other.chapter_num,
            other.verse_num,
        ))
    }
}

impl PartialOrd for VerseId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VerseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}:{}", self.book_name, self.chapter_num, self.verse_num)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verse {
    pub text: String,
    pub id: VerseId,
}

impl Verse {
    /// Parses `"<Book> <chapter>:<verse>\t<text>"`.
    ///
    /// `index` is the verse's position among verse lines and `line` the 1-based
    /// source line, used only for error reporting.
    pub fn from_line(raw: &str, index: usize, line: usize) -> Result<Self, ParseError> {
        let fail = |kind| ParseError::new(line, raw, kind);

        let (reference, text) = raw.split_once('\t').ok_or_else(|| fail(ParseErrorKind::MissingTab))?;
        let (book_name, chapter_and_verse) = reference
            .rsplit_once(' ')
            .filter(|(book, _)| !book.trim().is_empty())
            .ok_or_else(|| fail(ParseErrorKind::MissingReference))?;
        let (chapter, verse) = chapter_and_verse
            .split_once(':')
            .ok_or_else(|| fail(ParseErrorKind::MissingColon))?;

        let chapter_num = parse_number(chapter, "chapter").map_err(fail)?;
        let verse_num = parse_number(verse, "verse").map_err(fail)?;

        Ok(Self {
            text: text.trim().to_string(),
            id: VerseId::new(book_name, chapter_num, verse_num, index),
        })
    }
}

impl fmt::Display for Verse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.id, self.text)
    }
}

fn parse_number(value: &str, field: &'static str) -> Result<u32, ParseErrorKind> {
    match value.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ParseErrorKind::InvalidNumber {
            field,
            value: value.to_string(),
        }),
    }
}

/// Splits a corpus text into its version label and verses.
///
/// Line 1 is a format marker and is skipped, line 2 holds the version label,
/// and every following line is a verse. The text is expected to end with a
/// newline, so the last split element is dropped without being looked at.
pub fn parse_corpus_text(content: &str) -> Result<(String, Vec<Verse>), ParseError> {
    let lines: Vec<&str> = content.split('\n').collect();

    let version_label = lines
        .get(1)
        .map(|label| label.trim())
        .filter(|label| !label.is_empty())
        .ok_or_else(|| ParseError::new(HEADER_LINES, "", ParseErrorKind::MissingVersionLabel))?
        .to_string();

    let last = lines.len() - 1;
    let mut verses = Vec::with_capacity(last.saturating_sub(HEADER_LINES));

    for (line_no, raw) in lines.iter().enumerate().take(last).skip(HEADER_LINES) {
        let verse = Verse::from_line(raw, line_no - HEADER_LINES, line_no + 1)?;
        verses.push(verse);
    }

    Ok((version_label, verses))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_verse_line() {
        let verse = Verse::from_line("Genesis 1:1\tIn the beginning God created the heaven and the earth.", 0, 3)
            .unwrap();
        assert_eq!(verse.id, VerseId::new("Genesis", 1, 1, 0));
        assert_eq!(verse.text, "In the beginning God created the heaven and the earth.");
    }

    #[test]
    fn book_names_may_contain_spaces() {
        let verse = Verse::from_line("1 Corinthians 13:4\tCharity suffereth long, and is kind;", 7, 9).unwrap();
        assert_eq!(verse.id.book_name, "1 Corinthians");
        assert_eq!(verse.id.chapter_num, 13);
        assert_eq!(verse.id.verse_num, 4);
        assert_eq!(verse.id.index, 7);

        let verse = Verse::from_line("Song of Solomon 2:1\tI am the rose of Sharon", 0, 3).unwrap();
        assert_eq!(verse.id.book_name, "Song of Solomon");
    }

    #[test]
    fn verse_text_is_trimmed() {
        let verse = Verse::from_line("John 11:35\t  Jesus wept. \r", 0, 3).unwrap();
        assert_eq!(verse.text, "Jesus wept.");
    }

    #[test]
    fn display_matches_reference_format() {
        let verse = Verse::from_line("John 11:35\tJesus wept.", 0, 3).unwrap();
        assert_eq!(verse.id.to_string(), "John, 11:35");
        assert_eq!(verse.to_string(), "John, 11:35\tJesus wept.");
    }

    #[test]
    fn malformed_lines_report_their_kind() {
        let cases = [
            ("Genesis 1:1 no tab here", ParseErrorKind::MissingTab),
            ("Genesis\ttext", ParseErrorKind::MissingReference),
            (" 1:1\ttext", ParseErrorKind::MissingReference),
            ("Genesis 1-1\ttext", ParseErrorKind::MissingColon),
            (
                "Genesis one:1\ttext",
                ParseErrorKind::InvalidNumber { field: "chapter", value: "one".into() },
            ),
            (
                "Genesis 1:\ttext",
                ParseErrorKind::InvalidNumber { field: "verse", value: "".into() },
            ),
            (
                "Genesis 0:1\ttext",
                ParseErrorKind::InvalidNumber { field: "chapter", value: "0".into() },
            ),
        ];

        for (line, kind) in cases {
            let err = Verse::from_line(line, 0, 12).unwrap_err();
            assert_eq!(err.kind, kind, "line {line:?}");
            assert_eq!(err.line, 12);
            assert_eq!(err.content, line);
        }
    }

    #[test]
    fn corpus_text_skips_header_and_trailing_newline() {
        let content = "\u{feff}#format\n  King James Version \nGenesis 1:1\tfirst\nGenesis 1:2\tsecond\n";
        let (label, verses) = parse_corpus_text(content).unwrap();
        assert_eq!(label, "King James Version");
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[1].id, VerseId::new("Genesis", 1, 2, 1));
    }

    #[test]
    fn last_line_is_dropped_even_without_trailing_newline() {
        let content = "#\nKJV\nGenesis 1:1\tfirst\nGenesis 1:2\tsecond";
        let (_, verses) = parse_corpus_text(content).unwrap();
        assert_eq!(verses.len(), 1);
    }

    #[test]
    fn header_only_corpus_has_no_verses() {
        let (label, verses) = parse_corpus_text("#\nKJV\n").unwrap();
        assert_eq!(label, "KJV");
        assert!(verses.is_empty());
    }

    #[test]
    fn missing_label_is_an_error() {
        let err = parse_corpus_text("only a marker").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingVersionLabel);
        assert_eq!(err.line, 2);

        let err = parse_corpus_text("#\n   \nGenesis 1:1\tx\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingVersionLabel);
    }

    #[test]
    fn errors_carry_the_physical_line_number() {
        let content = "#\nKJV\nGenesis 1:1\tok\nGenesis 1:2 broken\nGenesis 1:3\tok\n";
        let err = parse_corpus_text(content).unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(err.kind, ParseErrorKind::MissingTab);
    }

    #[test]
    fn verse_ids_order_by_corpus_position() {
        let a = VerseId::new("Revelation", 22, 21, 0);
        let b = VerseId::new("Genesis", 1, 1, 1);
        assert!(a < b);
    }
}
