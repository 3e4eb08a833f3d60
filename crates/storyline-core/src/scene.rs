// File: crates/storyline-core/src/scene.rs
// Summary: Scene, annotation, and narrative model; narratives can be authored in Rust or TOML.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::DatasetRef;
use crate::error::NarrativeError;

/// Closed set of chart families a scene can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    CategoricalBar,
    Scatter,
    StackedBar,
    SingleLine,
    MultiLine,
    Pie,
    TimeSeriesBand,
}

impl ChartKind {
    pub const ALL: [ChartKind; 7] = [
        ChartKind::CategoricalBar,
        ChartKind::Scatter,
        ChartKind::StackedBar,
        ChartKind::SingleLine,
        ChartKind::MultiLine,
        ChartKind::Pie,
        ChartKind::TimeSeriesBand,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::CategoricalBar => "categorical-bar",
            ChartKind::Scatter => "scatter",
            ChartKind::StackedBar => "stacked-bar",
            ChartKind::SingleLine => "single-line",
            ChartKind::MultiLine => "multi-line",
            ChartKind::Pie => "pie",
            ChartKind::TimeSeriesBand => "time-series-band",
        }
    }
}

/// Where a callout points. Semantic anchors are resolved against the scales of the rendered chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anchor {
    /// Mount pixel coordinates.
    Pixel { x: f32, y: f32 },
    /// Fractions of the plot rectangle (0,0 top-left; 1,1 bottom-right).
    Relative { x: f32, y: f32 },
    /// Data-space point on continuous x/y scales.
    Value { x: f64, y: f64 },
    /// Center of a category band, at `value` or at the category's drawn top.
    Category {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
    /// Date on a time axis; the primary series is interpolated when `value` is absent.
    Date {
        date: NaiveDate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
    /// Centroid of a pie slice.
    Slice { key: String },
}

/// Cosmetic hints for a callout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    /// `#rrggbb` accent for the leader line and border.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub dx: f32,
    #[serde(default = "default_dy")]
    pub dy: f32,
}

fn default_dy() -> f32 { -30.0 }

impl Default for AnnotationStyle {
    fn default() -> Self { Self { color: None, dx: 0.0, dy: default_dy() } }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub anchor: Anchor,
    pub text: String,
    #[serde(default)]
    pub style: AnnotationStyle,
}

impl Annotation {
    pub fn new(anchor: Anchor, text: impl Into<String>) -> Self {
        Self { anchor, text: text.into(), style: AnnotationStyle::default() }
    }

    pub fn color(mut self, hex: impl Into<String>) -> Self {
        self.style.color = Some(hex.into());
        self
    }

    pub fn offset(mut self, dx: f32, dy: f32) -> Self {
        self.style.dx = dx;
        self.style.dy = dy;
        self
    }
}

/// Shaded date range drawn behind a time series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighlightBand {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Per-scene chart knobs. Renderers ignore fields that do not apply to their kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub x_label: String,
    pub y_label: String,
    /// Appended to y tick labels and tooltips, e.g. `" GW"` or `"%"`.
    pub unit: String,
    pub y_max: Option<f64>,
    /// Categorical bar: order bars by value, largest first.
    pub sort_descending: bool,
    /// Categorical bar: bar height is the sum of the selected columns.
    pub sum_columns: bool,
    /// Categories drawn in the accent color.
    pub highlight: Vec<String>,
    /// Scatter: print the key next to each point.
    pub point_labels: bool,
    /// Pie: inner radius as a fraction of the outer radius (donut when > 0).
    pub donut: Option<f32>,
    pub bands: Vec<HighlightBand>,
    /// Series/category key to `#rrggbb`, overriding the configured palette.
    pub colors: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub chart: ChartKind,
    pub dataset: DatasetRef,
    #[serde(default)]
    pub options: ChartOptions,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl Scene {
    pub fn new(index: usize, title: impl Into<String>, description: impl Into<String>, chart: ChartKind, dataset: DatasetRef) -> Self {
        Self {
            index,
            title: title.into(),
            description: description.into(),
            chart,
            dataset,
            options: ChartOptions::default(),
            annotations: Vec::new(),
        }
    }

    pub fn options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    pub fn annotate(mut self, a: Annotation) -> Self {
        self.annotations.push(a);
        self
    }
}

/// Validated scene sequence. Indices are dense `0..len`, stored in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Narrative {
    title: String,
    scenes: Vec<Scene>,
}

impl Narrative {
    pub fn new(title: impl Into<String>, mut scenes: Vec<Scene>) -> Result<Self, NarrativeError> {
        if scenes.is_empty() {
            return Err(NarrativeError::Empty);
        }
        scenes.sort_by_key(|s| s.index);
        if scenes.iter().enumerate().any(|(i, s)| s.index != i) {
            return Err(NarrativeError::NonContiguous { base: 0, found: scenes.iter().map(|s| s.index).collect() });
        }
        Ok(Self { title: title.into(), scenes })
    }

    pub fn title(&self) -> &str { &self.title }
    pub fn len(&self) -> usize { self.scenes.len() }
    pub fn is_empty(&self) -> bool { self.scenes.is_empty() }
    pub fn scene(&self, index: usize) -> Option<&Scene> { self.scenes.get(index) }
    pub fn scenes(&self) -> &[Scene] { &self.scenes }

    /// Parse a TOML narrative. Scene `index` values are either all omitted (file order)
    /// or all present and dense from 0 or from 1; 1-based files are shifted to 0-based.
    pub fn from_toml_str(s: &str) -> Result<Self, NarrativeError> {
        let file: NarrativeFile = toml::from_str(s)?;
        let given: Vec<Option<usize>> = file.scene.iter().map(|s| s.index).collect();
        let indices: Vec<usize> = if given.iter().all(Option::is_none) {
            (0..given.len()).collect()
        } else if given.iter().all(Option::is_some) {
            let mut raw: Vec<usize> = given.iter().flatten().copied().collect();
            let base = raw.iter().min().copied().unwrap_or(0);
            let mut sorted = raw.clone();
            sorted.sort_unstable();
            let dense = sorted.iter().enumerate().all(|(i, &v)| v == base + i);
            if base > 1 || !dense {
                return Err(NarrativeError::NonContiguous { base, found: raw });
            }
            raw.iter_mut().for_each(|v| *v -= base);
            raw
        } else {
            return Err(NarrativeError::MixedIndices);
        };

        let scenes = file
            .scene
            .into_iter()
            .zip(indices)
            .map(|(f, index)| Scene {
                index,
                title: f.title,
                description: f.description,
                chart: f.chart,
                dataset: f.dataset,
                options: f.options,
                annotations: f.annotation,
            })
            .collect();
        Self::new(file.title, scenes)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, NarrativeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| NarrativeError::Io { path: path.to_path_buf(), source: e })?;
        Self::from_toml_str(&text)
    }

    /// A built-in narrative name, or a path to a `.toml` file.
    pub fn resolve(arg: &str) -> Result<Self, NarrativeError> {
        if arg.ends_with(".toml") || Path::new(arg).exists() {
            Self::load(arg)
        } else {
            crate::narratives::builtin(arg)
        }
    }
}

#[derive(Deserialize)]
struct NarrativeFile {
    #[serde(default)]
    title: String,
    #[serde(default)]
    scene: Vec<SceneFile>,
}

#[derive(Deserialize)]
struct SceneFile {
    #[serde(default)]
    index: Option<usize>,
    title: String,
    #[serde(default)]
    description: String,
    chart: ChartKind,
    dataset: DatasetRef,
    #[serde(default)]
    options: ChartOptions,
    #[serde(default)]
    annotation: Vec<Annotation>,
}
