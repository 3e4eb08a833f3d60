// File: crates/storyline-core/src/samples.rs
// Summary: Bundled sample datasets (renewable capacity tables, CO2 shares) and the temperature generator.

use chrono::NaiveDate;

use crate::dataset::{Catalog, Dataset, Key, Record};
use crate::error::DatasetError;

fn cols(names: &[&str]) -> Vec<String> { names.iter().map(|s| s.to_string()).collect() }

fn categorical(id: &str, columns: &[&str], rows: &[(&str, &[f64])]) -> Dataset {
    let records = rows.iter().map(|(k, v)| Record::new(Key::category(*k), v.to_vec())).collect();
    Dataset { id: id.to_string(), columns: cols(columns), records }
}

fn yearly(id: &str, columns: &[&str], rows: &[(i32, &[f64])]) -> Dataset {
    let records = rows.iter().map(|(y, v)| Record::new(Key::Number(*y as f64), v.to_vec())).collect();
    Dataset { id: id.to_string(), columns: cols(columns), records }
}

/// Installed renewable capacity per country in 2020 (GW).
pub fn renewables_2020() -> Dataset {
    categorical(
        "renewables_2020",
        &["solar", "wind", "hydro", "biomass"],
        &[
            ("China", &[253.0, 281.0, 356.0, 15.0]),
            ("United States", &[75.0, 122.0, 102.0, 12.0]),
            ("Germany", &[54.0, 62.0, 20.0, 8.0]),
            ("India", &[39.0, 38.0, 50.0, 10.0]),
            ("Japan", &[67.0, 4.0, 50.0, 3.0]),
            ("Spain", &[15.0, 27.0, 20.0, 1.0]),
            ("Italy", &[21.0, 11.0, 20.0, 3.0]),
            ("United Kingdom", &[13.0, 24.0, 4.0, 3.0]),
            ("France", &[11.0, 17.0, 63.0, 2.0]),
            ("Brazil", &[7.0, 19.0, 109.0, 15.0]),
        ],
    )
}

/// Renewable capacity by world region in 2023 (GW).
pub fn regional_capacity_2023() -> Dataset {
    categorical(
        "regional_capacity_2023",
        &["solar", "wind", "hydro"],
        &[
            ("Asia Pacific", &[280.0, 320.0, 450.0]),
            ("Europe", &[180.0, 280.0, 200.0]),
            ("North America", &[120.0, 200.0, 180.0]),
            ("South America", &[15.0, 25.0, 150.0]),
            ("Africa", &[8.0, 12.0, 35.0]),
            ("Middle East", &[25.0, 8.0, 15.0]),
        ],
    )
}

pub fn growth_trends() -> Dataset {
    yearly(
        "growth_trends",
        &["solar", "wind"],
        &[
            (2015, &[50.0, 80.0]),
            (2016, &[75.0, 95.0]),
            (2017, &[100.0, 110.0]),
            (2018, &[130.0, 130.0]),
            (2019, &[160.0, 150.0]),
            (2020, &[200.0, 180.0]),
            (2021, &[250.0, 220.0]),
            (2022, &[320.0, 280.0]),
            (2023, &[400.0, 350.0]),
        ],
    )
}

/// Electricity mix per region, percent of generation.
pub fn regional_mix() -> Dataset {
    categorical(
        "regional_mix",
        &["renewable", "fossil", "nuclear"],
        &[
            ("Europe", &[45.0, 35.0, 20.0]),
            ("North America", &[25.0, 60.0, 15.0]),
            ("Asia Pacific", &[20.0, 70.0, 10.0]),
            ("South America", &[60.0, 35.0, 5.0]),
            ("Africa", &[15.0, 80.0, 5.0]),
            ("Middle East", &[5.0, 90.0, 5.0]),
        ],
    )
}

pub fn future_projections() -> Dataset {
    yearly(
        "future_projections",
        &["optimistic", "moderate", "conservative"],
        &[
            (2024, &[450.0, 420.0, 400.0]),
            (2025, &[520.0, 480.0, 440.0]),
            (2026, &[600.0, 540.0, 480.0]),
            (2027, &[700.0, 600.0, 520.0]),
            (2028, &[800.0, 660.0, 560.0]),
            (2029, &[900.0, 720.0, 600.0]),
            (2030, &[1000.0, 780.0, 640.0]),
        ],
    )
}

/// Share of global fossil CO2 emissions (percent).
pub fn co2_shares() -> Dataset {
    categorical(
        "co2_shares",
        &["share"],
        &[
            ("China", &[31.0]),
            ("United States", &[14.0]),
            ("European Union", &[8.0]),
            ("India", &[7.0]),
            ("Russia", &[5.0]),
            ("Japan", &[3.0]),
            ("Rest of world", &[32.0]),
        ],
    )
}

/// Global temperature anomaly (°C vs. 1951-1980) per year, one record on January 1st.
/// Closed-form: quadratic warming trend plus an 11-year and a 60-year oscillation.
pub fn temperature_anomaly(start_year: i32, end_year: i32) -> Result<Dataset, DatasetError> {
    let id = "temperature_anomaly";
    let mut records = Vec::with_capacity((end_year - start_year + 1).max(0) as usize);
    for year in start_year..=end_year {
        let date = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| DatasetError::Parse {
            dataset: id.to_string(),
            line: (year - start_year) as u64 + 1,
            reason: format!("year {year} out of calendar range"),
        })?;
        let t = (year - 1880) as f64;
        let trend = -0.25 + 0.00007 * t * t;
        let cycle = 0.06 * (t * std::f64::consts::TAU / 11.0).sin() + 0.08 * (t * std::f64::consts::TAU / 60.0).sin();
        let v = ((trend + cycle) * 1000.0).round() / 1000.0;
        records.push(Record::new(Key::Date(date), vec![v]));
    }
    Dataset::new(id, cols(&["anomaly"]), records)
}

/// Register every sample under its dataset id.
pub fn register_all(catalog: &mut Catalog) {
    catalog.register_table(renewables_2020());
    catalog.register_table(regional_capacity_2023());
    catalog.register_table(growth_trends());
    catalog.register_table(regional_mix());
    catalog.register_table(future_projections());
    catalog.register_table(co2_shares());
    catalog.register_generator("temperature_anomaly", || temperature_anomaly(1880, 2023));
}
