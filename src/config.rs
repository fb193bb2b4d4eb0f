use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_CORPUS_DIR: &str = "bibles";
pub const DEFAULT_LOG_FILTER: &str = "verse_lexicon=info,actix_web=info";

/// Settings for the HTTP server. Every flag can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "verse-lexicon", about = "Check which words of a passage appear in a scripture text")]
pub struct ServerConfig {
    /// Address the HTTP API listens on
    #[arg(long, env = "VERSE_LEXICON_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Directory holding one `.txt` file per edition
    #[arg(long, env = "VERSE_LEXICON_CORPUS_DIR", default_value = DEFAULT_CORPUS_DIR)]
    pub corpus_dir: PathBuf,

    /// Edition to activate at startup, by label or file stem (e.g. `kjv`)
    #[arg(long, env = "VERSE_LEXICON_DEFAULT_VERSION")]
    pub default_version: Option<String>,
}

/// Installs the `tracing` subscriber on stderr, honouring `RUST_LOG` when set.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
