//! Turns harvested articles into [`ArticleRecord`]s.
//!
//! This is the record-producing stage between the collectors and row
//! expansion: it canonicalizes links, drops duplicates and stale articles,
//! parses dates, and attaches the detected municipalities.

use crate::candidates::CandidateNameExtractor;
use crate::context::ContextClassifier;
use crate::dates::parse_publication_date;
use crate::extractor::MunicipalityExtractor;
use crate::models::{ArticleRecord, HarvestedArticle};
use crate::utils::truncate_for_log;
use std::collections::HashSet;
use tracing::{debug, info, instrument};
use url::Url;

/// Build records for a batch of harvested articles.
///
/// # Arguments
///
/// * `articles` - Raw articles in harvest order
/// * `extractor` - Detects the municipalities of each article
/// * `min_year` - Oldest publication year kept, if any
///
/// # Returns
///
/// One [`ArticleRecord`] per kept article, in input order. Articles are
/// dropped when their link cannot be resolved, when an earlier article in
/// the batch had the same link, or when their parsed publication year is
/// below `min_year`. Missing or unreadable dates never drop an article.
#[instrument(level = "info", skip_all, fields(articles = articles.len(), min_year = ?min_year))]
pub fn annotate_articles<N, C>(
    articles: Vec<HarvestedArticle>,
    extractor: &MunicipalityExtractor<N, C>,
    min_year: Option<i32>,
) -> Vec<ArticleRecord>
where
    N: CandidateNameExtractor,
    C: ContextClassifier,
{
    let total = articles.len();
    let mut seen_links: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(total);
    let mut with_municipalities = 0usize;

    for (i, article) in articles.into_iter().enumerate() {
        let root = article.root_url.as_deref();
        let Some(link) = article.href.as_deref().and_then(|href| resolve_url(root, href)) else {
            debug!(index = i, "Skipping article without a resolvable link");
            continue;
        };
        if !seen_links.insert(link.clone()) {
            debug!(index = i, %link, "Skipping duplicate article link");
            continue;
        }

        let published = parse_publication_date(article.date.as_deref());
        if let (Some(year), Some(min)) = (published.year(), min_year) {
            if year < min {
                info!(index = i, year, min_year = min, "Ignoring article older than minimum year");
                continue;
            }
        }

        let municipalities = extractor.extract_joined(
            article.title.as_deref().unwrap_or_default(),
            article.content.as_deref().unwrap_or_default(),
        );
        if !municipalities.is_empty() {
            with_municipalities += 1;
        }

        let image_url = image_path(&article).and_then(|path| resolve_url(root, path));

        debug!(
            index = i,
            title = %truncate_for_log(article.title.as_deref().unwrap_or_default(), 120),
            %municipalities,
            publisher = ?article.publisher,
            date = %published,
            %link,
            "Annotated article"
        );

        records.push(ArticleRecord {
            title: article.title,
            content: article.content,
            publisher: article.publisher,
            source: article.source,
            published,
            link,
            image_url,
            search_term: article.search_term,
            municipalities,
        });
    }

    info!(
        total,
        kept = records.len(),
        with_municipalities,
        "Annotated harvested articles"
    );
    records
}

/// The image path a collector found: first `srcset` candidate, else `src`.
fn image_path(article: &HarvestedArticle) -> Option<&str> {
    article
        .image_srcset
        .as_deref()
        .and_then(|srcset| srcset.split_whitespace().next())
        .or(article.image_src.as_deref())
        .map(str::trim)
        .filter(|path| !path.is_empty())
}

/// Absolute URL for `href`, resolving relative paths against `root`.
///
/// Returns `None` for blank input, or for a relative path without a usable root.
pub fn resolve_url(root: Option<&str>, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if let Ok(absolute) = Url::parse(href) {
        return Some(absolute.to_string());
    }
    let base = Url::parse(root?.trim()).ok()?;
    base.join(href).ok().map(|url| url.to_string())
}
