// File: crates/storyline-core/src/lib.rs
// Summary: Core library entry point; exports the narrative model, controller, renderers, and frame painter.

pub mod annotate;
pub mod clock;
pub mod config;
pub mod controller;
pub mod csv_source;
pub mod dataset;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod mount;
pub mod narratives;
pub mod render;
pub mod samples;
pub mod scale;
pub mod scene;
pub mod schedule;
pub mod state;
pub mod text;
pub mod theme;
pub mod types;

pub use annotate::{AnnotationPlacer, CalloutPlacer};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StoryConfig;
pub use controller::{Command, NarrativeController, Panel, RenderStatus, SceneFailure, Step};
pub use dataset::{Catalog, CsvSource, Dataset, DatasetProvider, DatasetRef, DatasetView, DateWindow, Key, Record};
pub use error::{ConfigError, DatasetError, FailureKind, NarrativeError, RenderError, SceneError, TransitionError};
pub use frame::{FrameLayout, Stage};
pub use input::{Control, InputEvent, KeyInput};
pub use mount::{Mount, Owner};
pub use render::{ChartRenderer, ChartSize, RenderOptions, Renderers, Scales};
pub use scene::{Anchor, Annotation, ChartKind, ChartOptions, Narrative, Scene};
pub use state::{is_next_enabled, is_prev_enabled, progress_fraction, progress_percent, NarrativeState};
pub use theme::Theme;
pub use text::TextShaper;
