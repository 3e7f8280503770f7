//! Row expansion: one output row per detected municipality.
//!
//! An [`ArticleRecord`] whose municipalities field reads
//! `"Ilhéus-2913606,Itabuna-2914802"` becomes two rows, `"Ilhéus"` with
//! identifier `"2913606"` and `"Itabuna"` with `"2914802"`, both carrying a
//! copy of every other field. Joining the rows' `name-identifier` pairs back
//! with commas, in emission order, gives the original field.

use crate::models::{ArticleRecord, ExpandedRow};
use tracing::{info, instrument};

/// Explode every record into one row per comma-separated municipality and
/// split each entry's identifier into [`ExpandedRow::municipality_id`].
///
/// # Arguments
///
/// * `records` - Annotated articles whose `municipalities` field holds
///   `"Name-Identifier"` entries joined with commas
///
/// # Returns
///
/// One [`ExpandedRow`] per entry, indices renumbered from zero. Records
/// without a comma pass through as a single row. The identifier is whatever
/// follows the last hyphen, so hyphenated names such as `"Xique-Xique"` stay
/// whole; entries without a hyphen keep their text and get no identifier.
#[instrument(level = "info", skip_all, fields(records = records.len()))]
pub fn expand_rows(records: Vec<ArticleRecord>) -> Vec<ExpandedRow> {
    let input = records.len();
    let rows: Vec<ExpandedRow> = records
        .into_iter()
        .flat_map(explode)
        .enumerate()
        .map(|(index, record)| split_identifier(index, record))
        .collect();

    info!(input, output = rows.len(), "Expanded article rows");
    rows
}

/// One record per comma-separated entry, or the record itself.
fn explode(record: ArticleRecord) -> Vec<ArticleRecord> {
    if !record.municipalities.contains(',') {
        return vec![record];
    }
    record
        .municipalities
        .split(',')
        .map(|entry| ArticleRecord {
            municipalities: entry.trim().to_string(),
            ..record.clone()
        })
        .collect()
}

fn split_identifier(index: usize, mut record: ArticleRecord) -> ExpandedRow {
    let municipality_id = match record.municipalities.rsplit_once('-') {
        Some((name, id)) => {
            let id = id.trim().to_string();
            record.municipalities = name.trim().to_string();
            Some(id)
        }
        None => None,
    };
    ExpandedRow {
        index,
        record,
        municipality_id,
    }
}
