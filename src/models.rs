//! Data models for harvested articles and their processed representations.
//!
//! This module defines the records that flow through the pipeline:
//! - [`HarvestedArticle`]: raw fields as a collector scraped them
//! - [`ArticleRecord`]: a cleaned article with its detected municipalities
//! - [`ExpandedRow`]: one municipality per row, identifier split out
//!
//! Every text field a collector may fail to find is an `Option`; scraped
//! HTML is unreliable and a missing field never invalidates the article.

use crate::dates::PublicationDate;
use serde::{Deserialize, Serialize};

/// An article as handed over by a source collector.
///
/// Links and image paths may still be relative to `root_url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HarvestedArticle {
    /// Headline text.
    pub title: Option<String>,
    /// Body snippet shown under the headline.
    pub content: Option<String>,
    /// Publisher label as printed by the source (e.g. "G1 Bahia").
    pub publisher: Option<String>,
    /// Name of the source the article was collected from (e.g. "google_news").
    pub source: Option<String>,
    /// Base URL used to resolve relative links.
    pub root_url: Option<String>,
    /// Date as published: ISO 8601 attribute or Brazilian text date.
    pub date: Option<String>,
    /// Link to the full article, absolute or relative.
    pub href: Option<String>,
    /// Image `srcset`; its first candidate wins over `image_src`.
    pub image_srcset: Option<String>,
    /// Image `src`.
    pub image_src: Option<String>,
    /// Search term that surfaced the article.
    pub search_term: Option<String>,
}

/// A processed article carrying its detected municipalities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    pub title: Option<String>,
    pub content: Option<String>,
    pub publisher: Option<String>,
    pub source: Option<String>,
    /// Parsed date, `NotFound`, or the raw text that could not be read.
    pub published: PublicationDate,
    /// Absolute, canonical link; unique within a batch.
    pub link: String,
    pub image_url: Option<String>,
    pub search_term: Option<String>,
    /// Comma-joined `"Name-Identifier"` entries; after row expansion, a single name.
    pub municipalities: String,
}

/// One output row: an article paired with exactly one municipality.
///
/// `record.municipalities` holds the municipality name and
/// `municipality_id` its identifier, when the entry carried one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExpandedRow {
    /// Position in the expanded batch, contiguous from zero.
    pub index: usize,
    #[serde(flatten)]
    pub record: ArticleRecord,
    pub municipality_id: Option<String>,
}

impl ExpandedRow {
    /// The municipality name carried by this row.
    pub fn municipality(&self) -> &str {
        &self.record.municipalities
    }

    /// The row's entry in the `"Name-Identifier"` form it was expanded from.
    pub fn tagged(&self) -> String {
        match &self.municipality_id {
            Some(id) => format!("{}-{}", self.record.municipalities, id),
            None => self.record.municipalities.clone(),
        }
    }
}
