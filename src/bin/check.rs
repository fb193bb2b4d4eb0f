use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use verse_lexicon::config;
use verse_lexicon::corpus::Corpus;
use verse_lexicon::engine::search;

/// Prints which words of a passage appear in a scripture text.
#[derive(Debug, Parser)]
#[command(name = "verse-check")]
struct Args {
    /// Corpus file to check against
    #[arg(long, env = "VERSE_LEXICON_CORPUS", default_value = "bibles/kjv.txt")]
    corpus: PathBuf,

    /// Passage to check; read from stdin when omitted
    input: Option<PathBuf>,

    /// Also list the first verses containing each matched word
    #[arg(long, default_value_t = 0)]
    verses: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    config::init_tracing();
    let args = Args::parse();

    let corpus = Corpus::parse(&fs::read_to_string(&args.corpus)?)?;
    let text = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let result = search::classify(&text, &corpus);

    println!("In {}:", corpus.version_label());
    for entry in &result.matched {
        println!("    {}", entry.summary());
        let highlighter = search::Highlighter::new(&entry.token);
        for verse in search::verses_for(entry, &corpus)?.into_iter().take(args.verses) {
            let highlighted = highlighter.occurrences(&verse.text, "*", "*");
            println!("        {}\t{}", verse.id, highlighted);
        }
    }

    println!();
    println!("Not in {}:", corpus.version_label());
    for word in &result.unmatched {
        println!("    {word}");
    }

    println!();
    println!("Percentage of words in {}: {:.2}%", corpus.version_label(), result.coverage());
    Ok(())
}
