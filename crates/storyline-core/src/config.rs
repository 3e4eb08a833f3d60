// File: crates/storyline-core/src/config.rs
// Summary: Presentation configuration (frame, chart, reveal timing, theme, series colors) loaded from TOML.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::frame::{FOOTER_HEIGHT, HEADER_HEIGHT};
use crate::render::{ChartSize, RenderOptions};
use crate::theme::{self, Theme};
use crate::types::{Insets, HEIGHT, WIDTH};

/// Upper bound for every `*_ms` timing: ten minutes.
pub const MAX_TIMING_MS: u64 = 600_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Window (and exported image) size; the chart gets what the header and footer leave.
    pub width: i32,
    pub height: i32,
}

impl Default for FrameConfig {
    fn default() -> Self { Self { width: WIDTH, height: HEIGHT + HEADER_HEIGHT + FOOTER_HEIGHT } }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedSize {
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub margins: Insets,
    /// Fixed chart size inside the mount; omitted means fill the container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed: Option<FixedSize>,
    pub animation_ms: u64,
}

impl Default for ChartConfig {
    fn default() -> Self { Self { margins: Insets::default(), fixed: None, animation_ms: 1000 } }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// From the end of a render to the first callout.
    pub delay_ms: u64,
    /// Between consecutive callouts.
    pub stagger_ms: u64,
    pub fade_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self { Self { delay_ms: 1000, stagger_ms: 500, fade_ms: 500 } }
}

impl RevealConfig {
    /// Offset of callout `ordinal` from the moment the marks were drawn.
    pub fn offset(&self, ordinal: usize) -> Duration {
        let stagger = self.stagger_ms.saturating_mul(u64::try_from(ordinal).unwrap_or(u64::MAX));
        Duration::from_millis(self.delay_ms.saturating_add(stagger))
    }

    pub fn fade(&self) -> Duration { Duration::from_millis(self.fade_ms) }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    pub theme: String,
    pub frame: FrameConfig,
    pub chart: ChartConfig,
    pub reveal: RevealConfig,
    /// Series/category key to `#rrggbb`.
    pub colors: BTreeMap<String, String>,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            frame: FrameConfig::default(),
            chart: ChartConfig::default(),
            reveal: RevealConfig::default(),
            colors: BTreeMap::new(),
        }
    }
}

impl StoryConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: StoryConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io { path: path.to_path_buf(), source: e })?;
        let cfg = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), theme = %cfg.theme, "config loaded");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |m: String| Err(ConfigError::Invalid(m));
        if !theme::presets().iter().any(|t| t.name.eq_ignore_ascii_case(&self.theme)) {
            return invalid(format!("unknown theme '{}'", self.theme));
        }
        let (cw, ch) = self.chart_area();
        if cw < 100 || ch < 100 {
            return invalid(format!("frame {}x{} leaves no room for a chart", self.frame.width, self.frame.height));
        }
        let m = self.chart.margins;
        if m.hsum() as i32 >= cw || m.vsum() as i32 >= ch {
            return invalid("chart margins exceed the chart area".to_string());
        }
        if let Some(f) = self.chart.fixed {
            if f.width <= 0 || f.height <= 0 {
                return invalid(format!("fixed chart size {}x{} must be positive", f.width, f.height));
            }
        }
        let timings = [
            ("reveal.delay_ms", self.reveal.delay_ms),
            ("reveal.stagger_ms", self.reveal.stagger_ms),
            ("reveal.fade_ms", self.reveal.fade_ms),
            ("chart.animation_ms", self.chart.animation_ms),
        ];
        if let Some((name, ms)) = timings.iter().find(|(_, ms)| *ms > MAX_TIMING_MS) {
            return invalid(format!("{name} = {ms} exceeds {MAX_TIMING_MS} ms"));
        }
        if let Some((key, hex)) = self.colors.iter().find(|(_, hex)| theme::parse_hex(hex).is_none()) {
            return invalid(format!("color for '{key}' is not #rrggbb: '{hex}'"));
        }
        Ok(())
    }

    /// Mount size for the configured frame.
    pub fn chart_area(&self) -> (i32, i32) {
        (self.frame.width, self.frame.height - HEADER_HEIGHT - FOOTER_HEIGHT)
    }

    pub fn theme(&self) -> Theme { theme::find(&self.theme) }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            margins: self.chart.margins,
            size: match self.chart.fixed {
                Some(f) => ChartSize::Fixed { width: f.width, height: f.height },
                None => ChartSize::FromContainer,
            },
            colors: self.colors.iter().filter_map(|(k, v)| Some((k.clone(), theme::parse_hex(v)?))).collect(),
            animation: Duration::from_millis(self.chart.animation_ms),
            theme: self.theme(),
        }
    }
}
