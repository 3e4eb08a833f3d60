// File: crates/storyline-core/src/dataset.rs
// Summary: Dataset model, read-only views, and the provider/catalog the controller pulls scene data from.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Row key: what a record is "about" (x position on the chart).
#[derive(Clone, Debug, PartialEq)]
pub enum Key {
    Category(String),
    Number(f64),
    Date(NaiveDate),
}

impl Key {
    pub fn category(s: impl Into<String>) -> Self { Key::Category(s.into()) }

    /// Continuous position for numeric/date keys (dates as day numbers).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Key::Category(_) => None,
            Key::Number(n) => Some(*n),
            Key::Date(d) => Some(crate::scale::day_number(*d)),
        }
    }

    /// Date used for window filtering: dates as-is, integral numbers as January 1st of that year.
    pub fn date_like(&self) -> Option<NaiveDate> {
        match self {
            Key::Date(d) => Some(*d),
            Key::Number(n) if n.fract() == 0.0 => NaiveDate::from_ymd_opt(*n as i32, 1, 1),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Key::Category(s) => s.clone(),
            Key::Number(n) => crate::grid::format_tick(*n, ""),
            Key::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.label()) }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub key: Key,
    pub values: Vec<f64>,
}

impl Record {
    pub fn new(key: Key, values: Vec<f64>) -> Self { Self { key, values } }
}

/// Immutable table: named value columns, one record per key.
/// Contract: every record has `columns.len()` values; numeric/date keyed tables are sorted ascending.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub id: String,
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(id: impl Into<String>, columns: Vec<String>, mut records: Vec<Record>) -> Result<Self, DatasetError> {
        let id = id.into();
        for (i, r) in records.iter().enumerate() {
            if r.values.len() != columns.len() {
                return Err(DatasetError::Parse {
                    dataset: id,
                    line: i as u64 + 1,
                    reason: format!("expected {} values, found {}", columns.len(), r.values.len()),
                });
            }
        }
        if records.iter().all(|r| r.key.as_f64().is_some()) {
            records.sort_by(|a, b| {
                let (x, y) = (a.key.as_f64().unwrap_or(0.0), b.key.as_f64().unwrap_or(0.0));
                x.total_cmp(&y)
            });
        }
        Ok(Self { id, columns, records })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }
}

/// Inclusive date window, e.g. `1940-01-01 ..= 1980-12-31`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self { Self { start, end } }

    pub fn years(start: i32, end: i32) -> Option<Self> {
        Some(Self { start: NaiveDate::from_ymd_opt(start, 1, 1)?, end: NaiveDate::from_ymd_opt(end, 12, 31)? })
    }

    pub fn contains(&self, d: NaiveDate) -> bool { d >= self.start && d <= self.end }
}

/// What a scene renders: a dataset id plus an optional window, column selection, and row limit.
/// The scene names its data; it never owns it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<DateWindow>,
    /// Column names to keep, in this order. Empty keeps all columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take: Option<usize>,
}

impl DatasetRef {
    pub fn new(id: impl Into<String>) -> Self { Self { id: id.into(), ..Self::default() } }

    pub fn columns<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = cols.into_iter().map(Into::into).collect();
        self
    }

    pub fn window(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn take(mut self, n: usize) -> Self {
        self.take = Some(n);
        self
    }
}

/// Read-only window onto a shared dataset: a row range and a column projection. Never copies rows.
#[derive(Clone, Debug)]
pub struct DatasetView {
    dataset: Arc<Dataset>,
    rows: Range<usize>,
    columns: Vec<usize>,
}

impl DatasetView {
    /// Whole dataset, all columns.
    pub fn full(dataset: Arc<Dataset>) -> Self {
        let rows = 0..dataset.records.len();
        let columns = (0..dataset.columns.len()).collect();
        Self { dataset, rows, columns }
    }

    pub fn id(&self) -> &str { &self.dataset.id }
    pub fn records(&self) -> &[Record] { &self.dataset.records[self.rows.clone()] }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
    pub fn column_count(&self) -> usize { self.columns.len() }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|&c| self.dataset.columns[c].as_str()).collect()
    }

    /// Value of projected column `col` in `record`.
    pub fn value(&self, record: &Record, col: usize) -> f64 {
        self.columns.get(col).and_then(|&c| record.values.get(c)).copied().unwrap_or(0.0)
    }

    /// Sum over the projected columns.
    pub fn total(&self, record: &Record) -> f64 {
        self.columns.iter().filter_map(|&c| record.values.get(c)).sum()
    }

    /// `(key, value)` pairs of projected column `col`.
    pub fn series(&self, col: usize) -> impl Iterator<Item = (&Key, f64)> + '_ {
        self.records().iter().map(move |r| (&r.key, self.value(r, col)))
    }

    pub fn all_dates(&self) -> bool {
        self.records().iter().all(|r| matches!(r.key, Key::Date(_)))
    }

    pub fn shares(&self, dataset: &Arc<Dataset>) -> bool { Arc::ptr_eq(&self.dataset, dataset) }
}

/// Supplies datasets by id. Must be deterministic: the same id yields the same data.
pub trait DatasetProvider {
    fn dataset(&self, id: &str) -> Result<Arc<Dataset>, DatasetError>;

    /// Resolve a scene's reference into a view (window, columns, limit applied).
    fn view(&self, r: &DatasetRef) -> Result<DatasetView, DatasetError> {
        let dataset = self.dataset(&r.id)?;
        project(dataset, r)
    }
}

pub(crate) fn project(dataset: Arc<Dataset>, r: &DatasetRef) -> Result<DatasetView, DatasetError> {
    let columns = if r.columns.is_empty() {
        (0..dataset.columns.len()).collect()
    } else {
        r.columns
            .iter()
            .map(|name| {
                dataset.column_index(name).ok_or_else(|| DatasetError::MissingColumn {
                    dataset: dataset.id.clone(),
                    column: name.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut rows = 0..dataset.records.len();
    if let Some(w) = r.window {
        if dataset.records.iter().all(|rec| rec.key.date_like().is_some()) {
            // sorted ascending by construction, so the window is a contiguous range
            let recs = &dataset.records;
            let lo = recs.partition_point(|rec| rec.key.date_like().is_some_and(|d| d < w.start));
            let hi = recs.partition_point(|rec| rec.key.date_like().is_some_and(|d| d <= w.end));
            rows = lo..hi.max(lo);
        } else {
            tracing::warn!(dataset = %dataset.id, "date window ignored for non-temporal keys");
        }
    }
    if let Some(n) = r.take {
        rows.end = rows.end.min(rows.start + n);
    }
    if rows.is_empty() {
        return Err(DatasetError::Empty(dataset.id.clone()));
    }
    Ok(DatasetView { dataset, rows, columns })
}

/// Where a catalog entry's data comes from.
pub enum Source {
    Table(Arc<Dataset>),
    Generator(Box<dyn Fn() -> Result<Dataset, DatasetError>>),
    Csv(CsvSource),
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Table(d) => write!(f, "Table({})", d.id),
            Source::Generator(_) => f.write_str("Generator"),
            Source::Csv(c) => write!(f, "Csv({})", c.path.display()),
        }
    }
}

/// Delimited text with a date column and one or more value columns.
#[derive(Clone, Debug)]
pub struct CsvSource {
    pub path: PathBuf,
    pub date_column: String,
    pub value_columns: Vec<String>,
}

/// Keyed registry of dataset sources with a load-once cache.
#[derive(Debug, Default)]
pub struct Catalog {
    sources: HashMap<String, Source>,
    cache: RefCell<HashMap<String, Arc<Dataset>>>,
}

impl Catalog {
    pub fn new() -> Self { Self::default() }

    /// Catalog pre-populated with the bundled sample datasets.
    pub fn with_samples() -> Self {
        let mut c = Self::new();
        crate::samples::register_all(&mut c);
        c
    }

    pub fn register(&mut self, id: impl Into<String>, source: Source) {
        let id = id.into();
        self.cache.borrow_mut().remove(&id);
        self.sources.insert(id, source);
    }

    pub fn register_table(&mut self, dataset: Dataset) {
        let id = dataset.id.clone();
        self.register(id, Source::Table(Arc::new(dataset)));
    }

    pub fn register_generator<F>(&mut self, id: impl Into<String>, f: F)
    where
        F: Fn() -> Result<Dataset, DatasetError> + 'static,
    {
        self.register(id, Source::Generator(Box::new(f)));
    }

    pub fn register_csv(&mut self, id: impl Into<String>, source: CsvSource) {
        self.register(id, Source::Csv(source));
    }

    pub fn contains(&self, id: &str) -> bool { self.sources.contains_key(id) }

    pub fn ids(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        v.sort_unstable();
        v
    }
}

impl DatasetProvider for Catalog {
    fn dataset(&self, id: &str) -> Result<Arc<Dataset>, DatasetError> {
        if let Some(d) = self.cache.borrow().get(id) {
            return Ok(Arc::clone(d));
        }
        let source = self.sources.get(id).ok_or_else(|| DatasetError::Unknown(id.to_string()))?;
        let loaded = match source {
            Source::Table(d) => Arc::clone(d),
            Source::Generator(f) => Arc::new(f()?),
            Source::Csv(c) => Arc::new(crate::csv_source::load(id, c)?),
        };
        tracing::debug!(dataset = id, rows = loaded.records.len(), source = ?source, "dataset loaded");
        self.cache.borrow_mut().insert(id.to_string(), Arc::clone(&loaded));
        Ok(loaded)
    }
}
