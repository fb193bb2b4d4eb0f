//! HTTP API consumed by the browser front end.
//!
//! All routes read from a shared [`CorpusLibrary`]; only `/select` takes the
//! write lock, to change which edition is active.

use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, Responder, ResponseError, get, post, web};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::engine::search;
use crate::error::LibraryError;
use crate::library::CorpusLibrary;
use crate::preprocessing::tokenizer;

pub type SharedLibrary = web::Data<RwLock<CorpusLibrary>>;

const DEFAULT_TOP: usize = 10;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error("{word:?} does not appear in {version}")]
    UnknownWord { word: String, version: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Library(LibraryError::UnknownVersion(_)) | ApiError::UnknownWord { .. } => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}

fn poisoned<T>(_: T) -> ApiError {
    ApiError::Internal("corpus library lock poisoned".to_string())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionsResponse {
    pub versions: Vec<String>,
    pub active: String,
}

impl VersionsResponse {
    fn from_library(library: &CorpusLibrary) -> Self {
        Self {
            versions: library.versions().map(String::from).collect(),
            active: library.active_label().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub text: String,
    pub version: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchedWord {
    pub word: String,
    pub count: usize,
    pub verse_count: usize,
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    pub version: String,
    pub matched: Vec<MatchedWord>,
    pub unmatched: Vec<String>,
    pub coverage: f64,
}

#[derive(Debug, Deserialize)]
pub struct VersionQuery {
    pub version: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerseView {
    pub reference: String,
    pub text: String,
    pub highlighted: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordVersesResponse {
    pub word: String,
    pub count: usize,
    pub verses: Vec<VerseView>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub version: Option<String>,
    pub top: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub version: String,
    pub verse_count: usize,
    pub vocabulary_size: usize,
    pub most_common: Vec<WordCount>,
}

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Verse Lexicon API")
}

#[get("/versions")]
async fn versions(data: SharedLibrary) -> Result<HttpResponse, ApiError> {
    let library = data.read().map_err(poisoned)?;
    Ok(HttpResponse::Ok().json(VersionsResponse::from_library(&library)))
}

#[post("/select")]
async fn select(request: web::Json<SelectRequest>, data: SharedLibrary) -> Result<HttpResponse, ApiError> {
    let mut library = data.write().map_err(poisoned)?;
    library.select(&request.version)?;
    Ok(HttpResponse::Ok().json(VersionsResponse::from_library(&library)))
}

#[post("/check")]
async fn check(request: web::Json<CheckRequest>, data: SharedLibrary) -> Result<HttpResponse, ApiError> {
    let library = data.read().map_err(poisoned)?;
    let corpus = library.get_or_active(request.version.as_deref())?;

    let result = search::classify(&request.text, corpus);
    let response = CheckResponse {
        version: corpus.version_label().to_string(),
        matched: result
            .matched
            .iter()
            .map(|entry| MatchedWord {
                word: entry.token.clone(),
                count: entry.count,
                verse_count: entry.verse_count(),
                summary: entry.summary(),
            })
            .collect(),
        unmatched: result.unmatched.clone(),
        coverage: result.coverage(),
    };

    info!(
        version = %response.version,
        matched = response.matched.len(),
        unmatched = response.unmatched.len(),
        "checked passage"
    );
    Ok(HttpResponse::Ok().json(response))
}

#[get("/words/{word}/verses")]
async fn word_verses(
    path: web::Path<String>,
    query: web::Query<VersionQuery>,
    data: SharedLibrary,
) -> Result<HttpResponse, ApiError> {
    let library = data.read().map_err(poisoned)?;
    let corpus = library.get_or_active(query.version.as_deref())?;

    let raw = path.into_inner();
    let entry = tokenizer::normalize(&raw)
        .and_then(|token| corpus.lookup(&token))
        .ok_or_else(|| ApiError::UnknownWord {
            word: raw.clone(),
            version: corpus.version_label().to_string(),
        })?;

    let verses = search::verses_for(entry, corpus).map_err(|e| {
        error!(word = %entry.token, version = %corpus.version_label(), error = %e, "index points outside its corpus");
        ApiError::Internal(e.to_string())
    })?;

    let highlighter = search::Highlighter::new(&entry.token);
    let response = WordVersesResponse {
        word: entry.token.clone(),
        count: entry.count,
        verses: verses
            .into_iter()
            .map(|verse| VerseView {
                reference: verse.id.to_string(),
                text: verse.text.clone(),
                highlighted: highlighter.html(&verse.text),
            })
            .collect(),
    };
    Ok(HttpResponse::Ok().json(response))
}

#[get("/stats")]
async fn stats(query: web::Query<StatsQuery>, data: SharedLibrary) -> Result<HttpResponse, ApiError> {
    let library = data.read().map_err(poisoned)?;
    let corpus = library.get_or_active(query.version.as_deref())?;
    let index = corpus.word_index();

    let response = StatsResponse {
        version: corpus.version_label().to_string(),
        verse_count: corpus.verses().len(),
        vocabulary_size: index.len(),
        most_common: index
            .most_common(query.top.unwrap_or(DEFAULT_TOP))
            .into_iter()
            .map(|entry| WordCount {
                word: entry.token.clone(),
                count: entry.count,
            })
            .collect(),
    };
    Ok(HttpResponse::Ok().json(response))
}

/// Registers every route; shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(hello)
        .service(versions)
        .service(select)
        .service(check)
        .service(word_verses)
        .service(stats);
}

pub async fn run(bind: &str, library: CorpusLibrary) -> std::io::Result<()> {
    let app_state: SharedLibrary = web::Data::new(RwLock::new(library));

    info!(%bind, "starting HTTP server");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();
        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}
