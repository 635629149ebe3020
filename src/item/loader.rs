use super::Item;
use crate::error::{TfResult, TitleForgeError};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

const TITLE_COLUMNS: &[&str] = &["title"];
const METRIC_COLUMNS: &[&str] = &["views", "metric_value", "metricvalue"];
const TIMESTAMP_COLUMNS: &[&str] = &[
    "published_at",
    "publishedat",
    "timestamp_created",
    "timestampcreated",
];

/// Loads items from a `.csv` or `.json` file, picked by extension.
pub fn load_items<P: AsRef<Path>>(path: P) -> TfResult<Vec<Item>> {
    let path = path.as_ref();
    info!("📂 Loading items from: {}", path.display());

    let file = File::open(path).map_err(|e| {
        TitleForgeError::Config(format!("Could not open items at '{}': {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let items = match ext.as_deref() {
        Some("json") => load_items_json(reader)?,
        Some("csv") | None => load_items_csv(reader)?,
        Some(other) => {
            return Err(TitleForgeError::Config(format!(
                "Unsupported items format '.{}' (expected .csv or .json)",
                other
            )))
        }
    };

    info!("   Loaded {} items", items.len());
    Ok(items)
}

// Timestamps stay text until `Item::from_rfc3339`, so a bad date is bad input
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    title: String,
    #[serde(alias = "views")]
    metric_value: f64,
    #[serde(alias = "published_at", alias = "publishedAt")]
    timestamp_created: String,
}

/// Reads a JSON array of items. Every item is validated before returning.
pub fn load_items_json<R: Read>(reader: R) -> TfResult<Vec<Item>> {
    let raw: Vec<RawItem> = serde_json::from_reader(reader)?;
    raw.into_iter()
        .enumerate()
        .map(|(idx, r)| {
            Item::from_rfc3339(r.title, r.metric_value, &r.timestamp_created)
                .map_err(|e| TitleForgeError::invalid(format!("[Item {}] {}", idx, e)))
        })
        .collect()
}

/// Reads `title,views,published_at` rows (header names are matched loosely).
/// Blank rows are skipped; a row with a bad number or timestamp fails the load.
pub fn load_items_csv<R: Read>(reader: R) -> TfResult<Vec<Item>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let find = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.contains(&h.to_ascii_lowercase().as_str()))
    };

    let (title_idx, metric_idx, ts_idx) = match (
        find(TITLE_COLUMNS),
        find(METRIC_COLUMNS),
        find(TIMESTAMP_COLUMNS),
    ) {
        (Some(t), Some(m), Some(ts)) => (t, m, ts),
        _ => {
            return Err(TitleForgeError::Config(format!(
                "CSV header must contain title, views and published_at columns, got: {:?}",
                headers.iter().collect::<Vec<_>>()
            )))
        }
    };

    let mut items = Vec::new();
    let mut skipped = 0;

    for (row_idx, result) in rdr.records().enumerate() {
        let row = row_idx + 1;
        let rec = result?;

        if rec.iter().all(|f| f.is_empty()) {
            skipped += 1;
            continue;
        }

        let (Some(title), Some(metric), Some(ts)) =
            (rec.get(title_idx), rec.get(metric_idx), rec.get(ts_idx))
        else {
            return Err(TitleForgeError::invalid(format!(
                "[Row {}] expected at least {} fields, found {}",
                row,
                title_idx.max(metric_idx).max(ts_idx) + 1,
                rec.len()
            )));
        };

        let metric: f64 = metric.parse().map_err(|_| {
            TitleForgeError::invalid(format!("[Row {}] views '{}' is not a number", row, metric))
        })?;

        let item = Item::from_rfc3339(title, metric, ts)
            .map_err(|e| TitleForgeError::invalid(format!("[Row {}] {}", row, e)))?;
        debug!("   Row {}: '{}' ({} views)", row, item.title, item.metric_value);
        items.push(item);
    }

    if skipped > 0 {
        warn!("⚠️  Skipped {} blank rows in items CSV.", skipped);
    }

    Ok(items)
}
