// File: crates/storyline-core/src/error.rs
// Summary: Error taxonomy for transitions, datasets, rendering, narratives, and configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::scene::ChartKind;

/// Rejected navigation request. State is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("scene {requested} is out of range (narrative has {total} scenes)")]
    OutOfRange { requested: usize, total: usize },
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("unknown dataset '{0}'")]
    Unknown(String),
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset '{dataset}' line {line}: {reason}")]
    Parse { dataset: String, line: u64, reason: String },
    #[error("dataset '{dataset}' has no column '{column}'")]
    MissingColumn { dataset: String, column: String },
    #[error("dataset '{0}' has no rows in the requested window")]
    Empty(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("no renderer registered for {0:?}")]
    NoRenderer(ChartKind),
    #[error("{kind:?} cannot draw this data: {reason}")]
    Shape { kind: ChartKind, reason: String },
    #[error("{0:?} received an empty dataset view")]
    EmptyData(ChartKind),
}

/// Why a scene could not be drawn; the controller keeps the target scene and shows a notice.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("data unavailable: {0}")]
    DatasetUnavailable(#[from] DatasetError),
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}

impl SceneError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SceneError::DatasetUnavailable(_) => FailureKind::DatasetUnavailable,
            SceneError::Render(_) => FailureKind::RenderFailure,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    DatasetUnavailable,
    RenderFailure,
}

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("a narrative needs at least one scene")]
    Empty,
    #[error("scene indices must be dense starting at {base}; found {found:?}")]
    NonContiguous { base: usize, found: Vec<usize> },
    #[error("scene indices must be all present or all omitted")]
    MixedIndices,
    #[error("unknown built-in narrative '{0}'")]
    UnknownBuiltin(String),
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("narrative toml: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
