//! # municipio_news
//!
//! Reads harvested news articles, detects which Bahia municipalities each
//! one refers to, and writes one row per (article, municipality) pair.
//!
//! ## Usage
//!
//! ```sh
//! municipio_news -i articles.json -g municipios.json -o rows.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Setup**: load config and gazetteer (a missing gazetteer is fatal)
//! 2. **Annotation**: resolve links, drop duplicates and stale articles, detect municipalities
//! 3. **Expansion**: one row per municipality, identifier split out
//! 4. **Output**: expanded rows as JSON

use clap::Parser;
use municipio_news::config::Config;
use municipio_news::gazetteer::{FileGazetteer, Gazetteer};
use municipio_news::models::HarvestedArticle;
use municipio_news::utils::ensure_writable_dir;
use municipio_news::{annotate_articles, expand_rows};
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("municipio_news starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Config ----
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let min_year = args.min_year.or(config.min_publication_year);

    // ---- Gazetteer (startup-fatal) ----
    let Some(gazetteer_path) = args.gazetteer.clone().or_else(|| config.gazetteer_path.clone())
    else {
        error!("No gazetteer given (use --gazetteer, MUNICIPIO_GAZETTEER or gazetteer_path in the config)");
        return Err("missing gazetteer path".into());
    };
    let gazetteer = match Gazetteer::load(&FileGazetteer::new(&gazetteer_path)) {
        Ok(g) => Arc::new(g),
        Err(e) => {
            error!(path = %gazetteer_path.display(), error = %e, "Failed to load gazetteer");
            return Err(e.into());
        }
    };
    let extractor = config.build_extractor(Arc::clone(&gazetteer))?;

    // ---- Input ----
    let raw = tokio::fs::read_to_string(&args.input).await?;
    let articles: Vec<HarvestedArticle> = serde_json::from_str(&raw)?;
    info!(count = articles.len(), path = %args.input.display(), "Read harvested articles");

    // ---- Annotate & expand ----
    let records = annotate_articles(articles, &extractor, min_year);
    let rows = expand_rows(records);
    let json = serde_json::to_string_pretty(&rows)?;

    // ---- Output ----
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_writable_dir(parent).await?;
            }
            tokio::fs::write(path, json).await?;
            info!(path = %path.display(), rows = rows.len(), "Wrote expanded rows");
        }
        None => println!("{json}"),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}
