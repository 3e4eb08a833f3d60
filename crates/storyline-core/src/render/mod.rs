// File: crates/storyline-core/src/render/mod.rs
// Summary: Chart renderer capability, per-kind registry, render options, and the scales contract
//          renderers hand back for annotation anchoring.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use chrono::Datelike;
use skia_safe as skia;

use crate::dataset::DatasetView;
use crate::error::RenderError;
use crate::geometry::{Point, RectF};
use crate::mount::Mount;
use crate::scale::{day_number, BandScale, LinearScale, TimeScale};
use crate::scene::{Anchor, ChartKind, Scene};
use crate::theme::Theme;
use crate::types::Insets;

mod axes;
mod bar;
mod band;
mod line;
mod pie;
mod scatter;
mod stacked;

pub use bar::BarRenderer;
pub use band::BandRenderer;
pub use line::LineRenderer;
pub use pie::PieRenderer;
pub use scatter::ScatterRenderer;
pub use stacked::StackedBarRenderer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartSize {
    /// Use the mount's full size.
    FromContainer,
    /// Explicit chart size, clamped to the mount and centered in it.
    Fixed { width: i32, height: i32 },
}

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub margins: Insets,
    pub size: ChartSize,
    /// Series/category key to color; scene-level colors take precedence.
    pub colors: BTreeMap<String, skia::Color>,
    /// Entrance animation length for marks. Zero draws marks in their final state.
    pub animation: Duration,
    pub theme: Theme,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            margins: Insets::default(),
            size: ChartSize::FromContainer,
            colors: BTreeMap::new(),
            animation: Duration::from_millis(1000),
            theme: Theme::light(),
        }
    }
}

impl RenderOptions {
    /// Color for series/category `key` at position `i`: scene override, configured map, then palette.
    pub fn color_for(&self, scene: &Scene, key: &str, i: usize) -> skia::Color {
        scene
            .options
            .colors
            .get(key)
            .and_then(|hex| crate::theme::parse_hex(hex))
            .or_else(|| self.colors.get(key).copied())
            .unwrap_or_else(|| self.theme.series_color(i))
    }

    /// Plot rectangle inside `mount` after sizing and margins.
    pub fn plot_rect(&self, mount: &Mount) -> RectF {
        let (mw, mh) = (mount.width(), mount.height());
        let (w, h) = match self.size {
            ChartSize::FromContainer => (mw, mh),
            ChartSize::Fixed { width, height } => (width.clamp(1, mw), height.clamp(1, mh)),
        };
        let ox = ((mw - w) / 2) as f32;
        let left = ox + self.margins.left as f32;
        let right = (ox + w as f32 - self.margins.right as f32).max(left + 1.0);
        let top = self.margins.top as f32;
        let bottom = (h as f32 - self.margins.bottom as f32).max(top + 1.0);
        RectF::from_ltrb(left, top, right, bottom)
    }
}

/// One chart family. Draws the scene's data into the mount and returns the scales it used.
pub trait ChartRenderer {
    fn render(&self, mount: &mut Mount, view: &DatasetView, scene: &Scene, opts: &RenderOptions) -> Result<Scales, RenderError>;
}

/// Chart kind to renderer. Dispatch never branches on geometry outside the renderers themselves.
pub struct Renderers {
    map: HashMap<ChartKind, Box<dyn ChartRenderer>>,
}

impl std::fmt::Debug for Renderers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.map.keys().collect();
        kinds.sort();
        f.debug_struct("Renderers").field("kinds", &kinds).finish()
    }
}

impl Default for Renderers {
    fn default() -> Self { Self::builtin() }
}

impl Renderers {
    pub fn empty() -> Self { Self { map: HashMap::new() } }

    pub fn builtin() -> Self {
        let mut r = Self::empty();
        r.set(ChartKind::CategoricalBar, BarRenderer);
        r.set(ChartKind::Scatter, ScatterRenderer);
        r.set(ChartKind::StackedBar, StackedBarRenderer);
        r.set(ChartKind::SingleLine, LineRenderer { multi: false });
        r.set(ChartKind::MultiLine, LineRenderer { multi: true });
        r.set(ChartKind::Pie, PieRenderer);
        r.set(ChartKind::TimeSeriesBand, BandRenderer);
        r
    }

    pub fn set(&mut self, kind: ChartKind, renderer: impl ChartRenderer + 'static) {
        self.map.insert(kind, Box::new(renderer));
    }

    pub fn get(&self, kind: ChartKind) -> Result<&dyn ChartRenderer, RenderError> {
        self.map.get(&kind).map(|b| b.as_ref()).ok_or(RenderError::NoRenderer(kind))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum XScale {
    None,
    Band(BandScale),
    Linear(LinearScale),
    Time(TimeScale),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SliceGeom {
    pub key: String,
    /// Degrees, Skia convention.
    pub start: f32,
    pub sweep: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadialLayout {
    pub center: Point,
    pub outer: f32,
    pub inner: f32,
    pub slices: Vec<SliceGeom>,
}

impl RadialLayout {
    pub fn centroid(&self, key: &str) -> Option<Point> {
        let s = self.slices.iter().find(|s| s.key == key)?;
        let a = (s.start + s.sweep * 0.5).to_radians();
        let r = (self.outer + self.inner) * 0.5;
        Some(Point::new(self.center.x + r * a.cos(), self.center.y + r * a.sin()))
    }
}

/// Data-to-pixel mapping produced by a render; what the annotation placer resolves anchors with.
#[derive(Clone, Debug, PartialEq)]
pub struct Scales {
    pub plot: RectF,
    pub x: XScale,
    pub y: Option<LinearScale>,
    pub radial: Option<RadialLayout>,
    /// Drawn top (data space) per category, for value-less category anchors.
    pub tops: BTreeMap<String, f64>,
    /// Primary series in data space, ascending x, for value-less date anchors.
    pub primary: Vec<(f64, f64)>,
    /// Pixel position of named point marks (scatter), for category anchors off a band axis.
    pub points: BTreeMap<String, Point>,
}

impl Scales {
    pub fn new(plot: RectF, x: XScale, y: Option<LinearScale>) -> Self {
        Self { plot, x, y, radial: None, tops: BTreeMap::new(), primary: Vec::new(), points: BTreeMap::new() }
    }

    /// Resolve an anchor to mount pixels; `None` when it does not fit this chart.
    pub fn resolve(&self, anchor: &Anchor) -> Option<Point> {
        match anchor {
            Anchor::Pixel { x, y } => Some(Point::new(*x, *y)),
            Anchor::Relative { x, y } => Some(Point::new(
                self.plot.left + x * self.plot.width(),
                self.plot.top + y * self.plot.height(),
            )),
            Anchor::Value { x, y } => {
                let px = match &self.x {
                    XScale::Linear(s) => s.to_px(*x),
                    XScale::Time(t) => t.linear.to_px(*x),
                    _ => return None,
                };
                Some(Point::new(px, self.y?.to_px(*y)))
            }
            Anchor::Category { name, value } => {
                if let Some(r) = &self.radial {
                    return r.centroid(name);
                }
                let XScale::Band(b) = &self.x else { return self.points.get(name).copied() };
                let v = value.or_else(|| self.tops.get(name).copied())?;
                Some(Point::new(b.center(name)?, self.y?.to_px(v)))
            }
            Anchor::Date { date, value } => {
                let dx = match &self.x {
                    XScale::Time(_) => day_number(*date),
                    // numeric year axes
                    XScale::Linear(_) => date.year() as f64,
                    _ => return None,
                };
                let v = match value {
                    Some(v) => *v,
                    None => interpolate(&self.primary, dx)?,
                };
                let px = match &self.x {
                    XScale::Time(t) => t.to_px(*date),
                    XScale::Linear(s) => s.to_px(dx),
                    _ => return None,
                };
                Some(Point::new(px, self.y?.to_px(v)))
            }
            Anchor::Slice { key } => self.radial.as_ref()?.centroid(key),
        }
    }
}

/// Linear interpolation over ascending `(x, y)` points; clamps outside the range.
pub fn interpolate(points: &[(f64, f64)], x: f64) -> Option<f64> {
    let first = points.first()?;
    let last = points.last()?;
    if x <= first.0 {
        return Some(first.1);
    }
    if x >= last.0 {
        return Some(last.1);
    }
    let i = points.partition_point(|p| p.0 <= x);
    let (a, b) = (points[i - 1], points[i]);
    let t = if (b.0 - a.0).abs() < 1e-12 { 0.0 } else { (x - a.0) / (b.0 - a.0) };
    Some(a.1 + t * (b.1 - a.1))
}
