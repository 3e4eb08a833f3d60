// File: crates/storyline-core/tests/datasets.rs
// Purpose: CSV ingestion, catalog caching, windowed/projected views sharing one allocation.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use chrono::NaiveDate;
use storyline_core::csv_source;
use storyline_core::samples;
use storyline_core::{Catalog, CsvSource, DatasetError, DatasetProvider, DatasetRef, DateWindow, Key};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

const SERIES: &str = "Date,Value\n2020-01-01,1.5\n2019-01-01,1.0\nnot-a-date,3\n2021-06-01,x\n2022/01/01,2.0\n";

#[test]
fn csv_rows_are_sorted_and_bad_rows_skipped() {
    let ds = csv_source::parse("series", SERIES.as_bytes(), "date", &["value".to_string()]).expect("parse");
    let keys: Vec<&Key> = ds.records.iter().map(|r| &r.key).collect();
    assert_eq!(keys, vec![&Key::Date(ymd(2019, 1, 1)), &Key::Date(ymd(2020, 1, 1)), &Key::Date(ymd(2022, 1, 1))]);
    assert_eq!(ds.records[1].values, vec![1.5]);
    assert_eq!(ds.columns, vec!["value".to_string()]);
}

#[test]
fn csv_missing_column_is_an_error() {
    let err = csv_source::parse("series", SERIES.as_bytes(), "date", &["anomaly".to_string()]).unwrap_err();
    assert!(matches!(err, DatasetError::MissingColumn { ref column, .. } if column == "anomaly"));
}

#[test]
fn csv_date_formats() {
    assert_eq!(csv_source::parse_date("1999"), Some(ymd(1999, 1, 1)));
    assert_eq!(csv_source::parse_date("1999-07"), Some(ymd(1999, 7, 1)));
    assert_eq!(csv_source::parse_date(" 1999-07-04 "), Some(ymd(1999, 7, 4)));
    assert_eq!(csv_source::parse_date("July 4"), None);
}

#[test]
fn csv_source_loads_through_the_catalog() {
    let dir = std::path::PathBuf::from("target/test_out");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("series.csv");
    std::fs::write(&path, SERIES).unwrap();

    let mut catalog = Catalog::new();
    catalog.register_csv("series", CsvSource { path, date_column: "date".into(), value_columns: vec!["value".into()] });
    let view = catalog.view(&DatasetRef::new("series").window(DateWindow::new(ymd(2019, 6, 1), ymd(2022, 1, 1)))).unwrap();
    assert_eq!(view.len(), 2);

    let mut missing = Catalog::new();
    missing.register_csv("gone", CsvSource { path: dir.join("nope.csv"), date_column: "date".into(), value_columns: vec![] });
    assert!(matches!(missing.dataset("gone"), Err(DatasetError::Io { .. })));
}

#[test]
fn views_share_the_cached_dataset() {
    let catalog = Catalog::with_samples();
    let a = catalog.dataset("renewables_2020").unwrap();
    let b = catalog.dataset("renewables_2020").unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let whole = catalog.view(&DatasetRef::new("renewables_2020")).unwrap();
    let part = catalog.view(&DatasetRef::new("renewables_2020").columns(["wind", "solar"]).take(3)).unwrap();
    assert!(whole.shares(&a) && part.shares(&a));
    assert_eq!(part.len(), 3);
    assert_eq!(part.column_names(), vec!["wind", "solar"]);
    let china = &part.records()[0];
    assert_eq!((part.value(china, 0), part.value(china, 1)), (281.0, 253.0));
    assert_eq!(whole.total(&whole.records()[0]), 905.0);
}

#[test]
fn generators_run_once() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let mut catalog = Catalog::new();
    catalog.register_generator("temps", move || {
        counter.set(counter.get() + 1);
        samples::temperature_anomaly(1900, 1910)
    });
    catalog.view(&DatasetRef::new("temps")).unwrap();
    catalog.view(&DatasetRef::new("temps")).unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn windows_filter_temporal_keys() {
    let catalog = Catalog::with_samples();
    let w = DateWindow::years(1940, 1980).unwrap();
    let view = catalog.view(&DatasetRef::new("temperature_anomaly").window(w)).unwrap();
    assert_eq!(view.len(), 41);
    assert_eq!(view.records()[0].key, Key::Date(ymd(1940, 1, 1)));

    // integral-number keys behave like years
    let growth = catalog.view(&DatasetRef::new("growth_trends").window(DateWindow::years(2020, 2021).unwrap())).unwrap();
    assert_eq!(growth.len(), 2);

    let empty = catalog.view(&DatasetRef::new("temperature_anomaly").window(DateWindow::years(1700, 1750).unwrap()));
    assert!(matches!(empty, Err(DatasetError::Empty(_))));
    assert!(matches!(catalog.dataset("nope"), Err(DatasetError::Unknown(_))));
    assert!(catalog.ids().contains(&"co2_shares") && catalog.contains("regional_mix"));
}

#[test]
fn temperature_generator_is_deterministic() {
    let a = samples::temperature_anomaly(1880, 2023).unwrap();
    let b = samples::temperature_anomaly(1880, 2023).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.records.len(), 144);
    let last = a.records.last().unwrap().values[0];
    let first = a.records[0].values[0];
    assert!(last > 1.0 && first < 0.0, "trend should warm: {first} -> {last}");
}
