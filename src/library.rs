use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::corpus::Corpus;
use crate::error::LibraryError;

const CORPUS_EXTENSION: &str = "txt";

/// The loaded editions and which one queries go to.
///
/// Corpora are keyed by their version label. File stems (`kjv`, `erv`) are kept
/// as lowercase aliases so either form can be used to pick an edition.
#[derive(Debug)]
pub struct CorpusLibrary {
    corpora: BTreeMap<String, Corpus>,
    aliases: BTreeMap<String, String>,
    active: String,
}

impl CorpusLibrary {
    /// Builds a library from already parsed corpora; the first one becomes active.
    pub fn from_corpora(corpora: impl IntoIterator<Item = Corpus>) -> Result<Self, LibraryError> {
        let mut corpora = corpora.into_iter();
        let first = corpora.next().ok_or(LibraryError::NoCorpora)?;

        let mut library = Self {
            active: first.version_label().to_string(),
            corpora: BTreeMap::new(),
            aliases: BTreeMap::new(),
        };
        library.insert(first)?;
        for corpus in corpora {
            library.insert(corpus)?;
        }
        Ok(library)
    }

    /// Parses every `*.txt` file in `dir`, in file-name order.
    pub fn load_dir(dir: &Path) -> Result<Self, LibraryError> {
        let io_err = |source| LibraryError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(io_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()
            .map_err(io_err)?;
        paths.retain(|path| path.is_file() && path.extension().is_some_and(|ext| ext == CORPUS_EXTENSION));
        paths.sort();

        let mut corpora = Vec::with_capacity(paths.len());
        let mut aliases = Vec::new();
        for path in &paths {
            let corpus = load_file(path)?;
            if let Some(alias) = alias_for(path) {
                aliases.push((alias, corpus.version_label().to_string()));
            }
            corpora.push(corpus);
        }

        if corpora.is_empty() {
            return Err(LibraryError::Empty(dir.to_path_buf()));
        }
        let mut library = Self::from_corpora(corpora)?;
        for (alias, label) in aliases {
            library.aliases.entry(alias).or_insert(label);
        }

        info!(
            versions = ?library.versions().collect::<Vec<_>>(),
            active = %library.active,
            "corpus library loaded"
        );
        Ok(library)
    }

    /// Adds a corpus under its version label, returning the label.
    pub fn insert(&mut self, corpus: Corpus) -> Result<String, LibraryError> {
        let label = corpus.version_label().to_string();
        if self.corpora.contains_key(&label) {
            return Err(LibraryError::DuplicateVersion(label));
        }
        self.corpora.insert(label.clone(), corpus);
        Ok(label)
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        if let Some((label, _)) = self.corpora.get_key_value(name) {
            return Some(label);
        }
        self.aliases.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Looks a corpus up by version label or file-stem alias.
    pub fn get(&self, name: &str) -> Option<&Corpus> {
        self.resolve(name).and_then(|label| self.corpora.get(label))
    }

    /// Version labels in sorted order.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.corpora.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.corpora.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpora.is_empty()
    }

    pub fn active(&self) -> &Corpus {
        // `active` is always a key of `corpora`: it is only set from inserted labels.
        &self.corpora[&self.active]
    }

    pub fn active_label(&self) -> &str {
        &self.active
    }

    /// Switches the active edition. Unknown names leave the selection unchanged.
    pub fn select(&mut self, name: &str) -> Result<&Corpus, LibraryError> {
        let label = self
            .resolve(name)
            .ok_or_else(|| LibraryError::UnknownVersion(name.to_string()))?
            .to_string();

        if label != self.active {
            info!(from = %self.active, to = %label, "active version changed");
            self.active = label;
        }
        Ok(self.active())
    }

    /// The named corpus, or the active one when no name is given.
    pub fn get_or_active(&self, name: Option<&str>) -> Result<&Corpus, LibraryError> {
        match name {
            Some(name) => self
                .get(name)
                .ok_or_else(|| LibraryError::UnknownVersion(name.to_string())),
            None => Ok(self.active()),
        }
    }
}

fn load_file(path: &Path) -> Result<Corpus, LibraryError> {
    debug!(path = %path.display(), "reading corpus");
    let content = fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Corpus::parse(&content).map_err(|source| LibraryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn alias_for(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const KJV: &str = "#\nKing James Version\nJohn 11:35\tJesus wept.\n";
    const ERV: &str = "#\nEnglish Revised Version\nJohn 11:35\tJesus wept.\nJohn 11:36\tThe Jews therefore said, Behold how he loved him!\n";

    fn write_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn load_dir_keys_by_label_and_aliases_by_stem() {
        let dir = write_dir(&[("kjv.txt", KJV), ("erv.txt", ERV), ("notes.md", "ignored")]);
        let library = CorpusLibrary::load_dir(dir.path()).unwrap();

        assert_eq!(
            library.versions().collect::<Vec<_>>(),
            vec!["English Revised Version", "King James Version"]
        );
        // erv.txt sorts first
        assert_eq!(library.active_label(), "English Revised Version");
        assert_eq!(library.get("kjv").unwrap().version_label(), "King James Version");
        assert_eq!(library.get("ERV").unwrap().verses().len(), 2);
        assert!(library.get("asv").is_none());
    }

    #[test]
    fn select_swaps_the_active_corpus() {
        let dir = write_dir(&[("kjv.txt", KJV), ("erv.txt", ERV)]);
        let mut library = CorpusLibrary::load_dir(dir.path()).unwrap();

        let selected = library.select("King James Version").unwrap();
        assert_eq!(selected.verses().len(), 1);
        assert_eq!(library.active().version_label(), "King James Version");

        library.select("erv").unwrap();
        assert_eq!(library.active_label(), "English Revised Version");
    }

    #[test]
    fn unknown_selection_keeps_current_corpus() {
        let dir = write_dir(&[("kjv.txt", KJV)]);
        let mut library = CorpusLibrary::load_dir(dir.path()).unwrap();

        let err = library.select("Vulgate").unwrap_err();
        assert!(matches!(err, LibraryError::UnknownVersion(name) if name == "Vulgate"));
        assert_eq!(library.active_label(), "King James Version");
    }

    #[test]
    fn get_or_active_falls_back_to_active() {
        let dir = write_dir(&[("kjv.txt", KJV), ("erv.txt", ERV)]);
        let library = CorpusLibrary::load_dir(dir.path()).unwrap();
        assert_eq!(library.get_or_active(None).unwrap().version_label(), "English Revised Version");
        assert_eq!(library.get_or_active(Some("kjv")).unwrap().version_label(), "King James Version");
        assert!(library.get_or_active(Some("nope")).is_err());
    }

    #[test]
    fn duplicate_labels_fail_the_load() {
        let dir = write_dir(&[("a.txt", KJV), ("b.txt", KJV)]);
        let err = CorpusLibrary::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, LibraryError::DuplicateVersion(label) if label == "King James Version"));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = write_dir(&[("bad.txt", "#\nBad\nJohn 11:35 no tab\n")]);
        let err = CorpusLibrary::load_dir(dir.path()).unwrap_err();
        match err {
            LibraryError::Parse { path, source } => {
                assert!(path.ends_with("bad.txt"));
                assert_eq!(source.line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = write_dir(&[]);
        assert!(matches!(CorpusLibrary::load_dir(dir.path()), Err(LibraryError::Empty(_))));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = write_dir(&[]);
        let missing = dir.path().join("nowhere");
        assert!(matches!(CorpusLibrary::load_dir(&missing), Err(LibraryError::Io { .. })));
    }

    #[test]
    fn from_corpora_selects_first() {
        let kjv = Corpus::parse(KJV).unwrap();
        let erv = Corpus::parse(ERV).unwrap();
        let library = CorpusLibrary::from_corpora([kjv, erv]).unwrap();
        assert_eq!(library.len(), 2);
        assert_eq!(library.active_label(), "King James Version");
    }

    #[test]
    fn from_corpora_needs_at_least_one() {
        let err = CorpusLibrary::from_corpora(Vec::<Corpus>::new()).unwrap_err();
        assert!(matches!(err, LibraryError::NoCorpora));
        assert_eq!(err.to_string(), "a corpus library needs at least one corpus");
    }
}
