use std::error::Error;

use clap::Parser;
use tracing::info;
use verse_lexicon::config::{self, ServerConfig};
use verse_lexicon::library::CorpusLibrary;
use verse_lexicon::server;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    config::init_tracing();
    let config = ServerConfig::parse();

    info!(dir = %config.corpus_dir.display(), "loading corpora");
    let corpus_dir = config.corpus_dir.clone();
    let mut library = tokio::task::spawn_blocking(move || CorpusLibrary::load_dir(&corpus_dir)).await??;

    if let Some(version) = &config.default_version {
        library.select(version)?;
    }

    server::run(&config.bind, library).await?;
    Ok(())
}
