//! Command-line interface definitions for municipio_news.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Values given here override the ones in the YAML config file.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the municipio_news binary.
///
/// # Examples
///
/// ```sh
/// # Annotate harvested articles and print the expanded rows
/// municipio_news -i articles.json -g municipios.json
///
/// # With a config file and an output file
/// municipio_news -i articles.json -c config.yaml -o rows.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// JSON array of harvested articles
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the expanded rows as JSON (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Gazetteer file (.json, .yaml or .yml) mapping municipality names to identifiers
    #[arg(short, long, env = "MUNICIPIO_GAZETTEER")]
    pub gazetteer: Option<PathBuf>,

    /// Drop articles published before this year (overrides the config)
    #[arg(long)]
    pub min_year: Option<i32>,
}
