// File: crates/storyline-core/src/narratives.rs
// Summary: Built-in narratives over the bundled sample datasets.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::dataset::{DatasetRef, DateWindow};
use crate::error::NarrativeError;
use crate::scene::{Anchor, Annotation, ChartKind, ChartOptions, HighlightBand, Narrative, Scene};

pub const NAMES: [&str; 3] = ["renewables", "outlook", "climate"];

pub fn names() -> &'static [&'static str] { &NAMES }

pub fn builtin(name: &str) -> Result<Narrative, NarrativeError> {
    match name {
        "renewables" => renewables(),
        "outlook" => outlook(),
        "climate" => climate(),
        other => Err(NarrativeError::UnknownBuiltin(other.to_string())),
    }
}

fn category(name: &str) -> Anchor { Anchor::Category { name: name.to_string(), value: None } }

fn category_at(name: &str, value: f64) -> Anchor { Anchor::Category { name: name.to_string(), value: Some(value) } }

/// January 1st of `y`; every year used here is in chrono's range.
fn year(y: i32) -> NaiveDate { NaiveDate::from_ymd_opt(y, 1, 1).unwrap_or_default() }

fn date_anchor(y: i32) -> Anchor { Anchor::Date { date: year(y), value: None } }

fn gw() -> ChartOptions { ChartOptions { unit: " GW".to_string(), ..ChartOptions::default() } }

fn source_colors() -> BTreeMap<String, String> {
    [("solar", "#FF9800"), ("wind", "#2196F3"), ("hydro", "#4CAF50"), ("biomass", "#9C27B0")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Country capacity in 2020: totals, solar against wind, then the full mix.
pub fn renewables() -> Result<Narrative, NarrativeError> {
    let data = || DatasetRef::new("renewables_2020");
    Narrative::new(
        "Renewable Energy Around the World",
        vec![
            Scene::new(
                0,
                "Scene 1: The Global Picture",
                "Discover the worldwide landscape of renewable energy adoption. This overview shows total renewable capacity by country, revealing the global leaders in clean energy transition.",
                ChartKind::CategoricalBar,
                data(),
            )
            .options(ChartOptions {
                sum_columns: true,
                sort_descending: true,
                highlight: vec!["China".to_string()],
                y_label: "Total capacity".to_string(),
                ..gw()
            })
            .annotate(Annotation::new(category("China"), "China leads with 905 GW total renewable capacity").color("#4CAF50").offset(150.0, -10.0))
            .annotate(Annotation::new(category("United States"), "United States follows with 311 GW capacity").color("#2196F3").offset(110.0, -40.0)),
            Scene::new(
                1,
                "Scene 2: Solar vs Wind Energy",
                "Compare the two dominant renewable energy sources: solar and wind power. See how different countries prioritize these technologies based on their geographical advantages.",
                ChartKind::Scatter,
                data().columns(["solar", "wind"]),
            )
            .options(ChartOptions {
                point_labels: true,
                x_label: "Solar capacity (GW)".to_string(),
                y_label: "Wind capacity (GW)".to_string(),
                ..ChartOptions::default()
            })
            .annotate(Annotation::new(category("China"), "China dominates both solar and wind capacity").color("#FF9800").offset(-170.0, 20.0))
            .annotate(Annotation::new(category("Germany"), "Germany shows strong solar adoption").color("#9C27B0").offset(40.0, -50.0)),
            Scene::new(
                2,
                "Scene 3: Energy Mix Diversity",
                "Explore the diversity of renewable energy sources. This final scene reveals how countries balance different renewable technologies to create resilient energy systems.",
                ChartKind::StackedBar,
                data(),
            )
            .options(ChartOptions { colors: source_colors(), y_label: "Capacity".to_string(), ..gw() })
            .annotate(Annotation::new(category("Brazil"), "Brazil shows excellent energy diversity").color("#4CAF50").offset(-90.0, -40.0))
            .annotate(Annotation::new(category_at("China", 712.0), "Hydro power remains crucial for many nations").color("#2196F3").offset(190.0, 0.0)),
        ],
    )
}

/// Regional capacity, growth since 2015, generation mix, and projections to 2030.
pub fn outlook() -> Result<Narrative, NarrativeError> {
    Narrative::new(
        "Renewable Energy Outlook",
        vec![
            Scene::new(
                0,
                "Renewable Energy Capacity by Region (2023)",
                "Installed solar, wind and hydro capacity across world regions.",
                ChartKind::StackedBar,
                DatasetRef::new("regional_capacity_2023"),
            )
            .options(ChartOptions { colors: source_colors(), ..gw() })
            .annotate(Annotation::new(category("Asia Pacific"), "Asia Pacific leads in total renewable capacity").offset(120.0, -10.0))
            .annotate(Annotation::new(category("Europe"), "Europe shows balanced renewable mix").offset(60.0, -40.0)),
            Scene::new(
                1,
                "Renewable Energy Growth Trends (2015-2023)",
                "Solar and wind capacity additions year over year.",
                ChartKind::MultiLine,
                DatasetRef::new("growth_trends"),
            )
            .options(ChartOptions { colors: source_colors(), x_label: "Year".to_string(), ..gw() })
            .annotate(Annotation::new(Anchor::Value { x: 2021.0, y: 250.0 }, "Solar energy surpassed wind in 2021").offset(-120.0, -40.0))
            .annotate(Annotation::new(date_anchor(2023), "Exponential growth continues").offset(-90.0, 10.0)),
            Scene::new(
                2,
                "Energy Mix by Region (2023)",
                "Share of electricity generation from renewable, fossil and nuclear sources.",
                ChartKind::StackedBar,
                DatasetRef::new("regional_mix"),
            )
            .options(ChartOptions { unit: "%".to_string(), y_max: Some(100.0), ..ChartOptions::default() })
            .annotate(Annotation::new(category_at("South America", 60.0), "South America leads in renewable adoption").offset(0.0, -24.0))
            .annotate(Annotation::new(category_at("Middle East", 95.0), "Middle East still heavily fossil fuel dependent").offset(-120.0, -16.0)),
            Scene::new(
                3,
                "Future Renewable Energy Projections (2024-2030)",
                "Three capacity scenarios through the end of the decade.",
                ChartKind::MultiLine,
                DatasetRef::new("future_projections"),
            )
            .options(ChartOptions { x_label: "Year".to_string(), ..gw() })
            .annotate(Annotation::new(Anchor::Value { x: 2028.0, y: 800.0 }, "Optimistic scenario shows rapid growth").offset(-150.0, -20.0))
            .annotate(Annotation::new(Anchor::Value { x: 2030.0, y: 640.0 }, "Conservative scenario still shows significant growth").offset(-170.0, 40.0)),
        ],
    )
}

/// Temperature record, the post-war plateau and recent warming, and who emits.
pub fn climate() -> Result<Narrative, NarrativeError> {
    let temps = || DatasetRef::new("temperature_anomaly");
    let window = DateWindow::new(year(1940), year(2023));
    let band = |a: i32, b: i32, label: &str, color: &str| HighlightBand {
        start: year(a),
        end: year(b),
        label: label.to_string(),
        color: Some(color.to_string()),
    };
    Narrative::new(
        "A Warming World",
        vec![
            Scene::new(
                0,
                "Global Temperature Anomaly (1880-2023)",
                "Yearly global surface temperature relative to the 1951-1980 average.",
                ChartKind::SingleLine,
                temps(),
            )
            .options(ChartOptions { unit: " °C".to_string(), y_label: "Anomaly".to_string(), ..ChartOptions::default() })
            .annotate(Annotation::new(date_anchor(1910), "Early-century cool period").offset(40.0, -60.0))
            .annotate(Annotation::new(date_anchor(2023), "Recent years sit more than 1 °C above the baseline").offset(-200.0, -10.0)),
            Scene::new(
                1,
                "Plateau and Acceleration (1940-2023)",
                "Mid-century temperatures held roughly level before a sustained rise from the late 1970s.",
                ChartKind::TimeSeriesBand,
                temps().window(window),
            )
            .options(ChartOptions {
                unit: " °C".to_string(),
                bands: vec![band(1940, 1975, "Mid-century plateau", "#2196F3"), band(1980, 2023, "Rapid warming", "#F44336")],
                ..ChartOptions::default()
            })
            .annotate(Annotation::new(date_anchor(1977), "Warming resumes in the late 1970s").offset(-60.0, -70.0)),
            Scene::new(
                2,
                "Who Emits? Fossil CO2 by Country",
                "Share of global fossil carbon dioxide emissions.",
                ChartKind::Pie,
                DatasetRef::new("co2_shares"),
            )
            .options(ChartOptions { unit: "%".to_string(), donut: Some(0.5), ..ChartOptions::default() })
            .annotate(Annotation::new(Anchor::Slice { key: "China".to_string() }, "China emits almost a third of the total").offset(160.0, -40.0))
            .annotate(Annotation::new(Anchor::Slice { key: "Rest of world".to_string() }, "Everyone else together is about the same").offset(-160.0, 40.0)),
        ],
    )
}
