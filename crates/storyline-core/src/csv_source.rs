// File: crates/storyline-core/src/csv_source.rs
// Summary: Loads date/value delimited text into a date-keyed dataset (header lookup, row validation).

use std::io::Read;

use chrono::NaiveDate;

use crate::dataset::{CsvSource, Dataset, Key, Record};
use crate::error::DatasetError;

/// Load a CSV source from disk.
pub fn load(id: &str, source: &CsvSource) -> Result<Dataset, DatasetError> {
    let file = std::fs::File::open(&source.path).map_err(|e| DatasetError::Io { path: source.path.clone(), source: e })?;
    parse(id, file, &source.date_column, &source.value_columns)
}

/// Parse CSV from any reader. Rows with an unparseable date or value are skipped with a warning.
pub fn parse<R: Read>(id: &str, reader: R, date_column: &str, value_columns: &[String]) -> Result<Dataset, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.iter().map(|h| h.to_lowercase()).collect::<Vec<_>>();
    let idx = |name: &str| -> Result<usize, DatasetError> {
        let want = name.to_lowercase();
        headers.iter().position(|h| *h == want).ok_or_else(|| DatasetError::MissingColumn {
            dataset: id.to_string(),
            column: name.to_string(),
        })
    };
    let i_date = idx(date_column)?;
    let i_values = value_columns.iter().map(|c| idx(c)).collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for rec in rdr.records() {
        let rec = rec?;
        let line = rec.position().map(|p| p.line()).unwrap_or(0);
        let Some(date) = rec.get(i_date).and_then(parse_date) else {
            tracing::warn!(dataset = id, line, "skipping row with unparseable date");
            skipped += 1;
            continue;
        };
        let values = i_values
            .iter()
            .map(|&i| rec.get(i).and_then(|s| s.parse::<f64>().ok()))
            .collect::<Option<Vec<f64>>>();
        match values {
            Some(values) => records.push(Record::new(Key::Date(date), values)),
            None => {
                tracing::warn!(dataset = id, line, "skipping row with unparseable value");
                skipped += 1;
            }
        }
    }
    if records.is_empty() {
        return Err(DatasetError::Empty(id.to_string()));
    }
    tracing::debug!(dataset = id, rows = records.len(), skipped, "csv parsed");
    Dataset::new(id, value_columns.to_vec(), records)
}

/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY-MM` (first of month), or a bare year.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y/%m/%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Some(d);
    }
    if s.len() == 4 {
        if let Ok(y) = s.parse::<i32>() {
            return NaiveDate::from_ymd_opt(y, 1, 1);
        }
    }
    None
}
