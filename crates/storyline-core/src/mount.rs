// File: crates/storyline-core/src/mount.rs
// Summary: Retained-mode mount point. Renderers and the annotation placer append tagged elements;
//          the controller clears it wholesale on every transition; the stage paints it with Skia.

use std::time::Duration;

use skia_safe as skia;

use crate::geometry::{Point, RectF};
use crate::scene::ChartKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Start,
    Middle,
    End,
}

/// Which collaborator drew an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Owner {
    Chart(ChartKind),
    Callout { ordinal: usize },
    Notice,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rect(RectF),
    RoundRect { rect: RectF, radius: f32 },
    Line { from: Point, to: Point, dashed: bool },
    Polyline(Vec<Point>),
    Circle { center: Point, radius: f32 },
    /// Annular sector; angles in degrees, clockwise from 3 o'clock (Skia convention).
    Wedge { center: Point, outer: f32, inner: f32, start: f32, sweep: f32 },
    Text { pos: Point, text: String, size: f32, align: Align, rotate: f32, bold: bool },
}

impl Shape {
    pub fn text(pos: Point, text: impl Into<String>, size: f32, align: Align) -> Self {
        Shape::Text { pos, text: text.into(), size, align, rotate: 0.0, bold: false }
    }

    fn contains(&self, p: Point) -> bool {
        match self {
            Shape::Rect(r) | Shape::RoundRect { rect: r, .. } => r.sorted().contains(p),
            Shape::Circle { center, radius } => center.distance(p) <= radius.max(4.0),
            Shape::Wedge { center, outer, inner, start, sweep } => {
                let d = center.distance(p);
                if d < *inner || d > *outer {
                    return false;
                }
                let a = (p.y - center.y).atan2(p.x - center.x).to_degrees();
                (a - start).rem_euclid(360.0) <= *sweep
            }
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub fill: Option<skia::Color>,
    pub stroke: Option<skia::Color>,
    pub stroke_width: f32,
    pub opacity: f32,
}

impl Style {
    pub fn fill(c: skia::Color) -> Self { Self { fill: Some(c), stroke: None, stroke_width: 0.0, opacity: 1.0 } }
    pub fn stroke(c: skia::Color, width: f32) -> Self { Self { fill: None, stroke: Some(c), stroke_width: width, opacity: 1.0 } }
    pub fn with_stroke(mut self, c: skia::Color, width: f32) -> Self {
        self.stroke = Some(c);
        self.stroke_width = width;
        self
    }
    pub fn with_opacity(mut self, o: f32) -> Self {
        self.opacity = o.clamp(0.0, 1.0);
        self
    }
}

/// How an element animates in, driven by its own `appear_at` and `duration`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Entrance {
    None,
    /// Rect grows upward from a baseline y.
    Grow { baseline: f32 },
    /// Circle radius scales from zero.
    Pop,
    /// Polyline draws on from its first point.
    Draw,
    /// Wedge sweep opens from its start angle.
    Sweep,
    /// Opacity ramps from zero, with a short upward slide.
    Fade,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub owner: Owner,
    pub shape: Shape,
    pub style: Style,
    pub entrance: Entrance,
    pub appear_at: Duration,
    pub duration: Duration,
    pub tooltip: Option<String>,
}

impl Element {
    pub fn with_entrance(&mut self, e: Entrance) -> &mut Self {
        self.entrance = e;
        self
    }
    pub fn with_tooltip(&mut self, t: impl Into<String>) -> &mut Self {
        self.tooltip = Some(t.into());
        self
    }
    /// Shift the entrance start (e.g. labels that follow their bars).
    pub fn delayed(&mut self, d: Duration) -> &mut Self {
        self.appear_at += d;
        self
    }

    /// Eased entrance progress at `now` in `[0, 1]`; 0 before `appear_at`.
    pub fn progress(&self, now: Duration) -> f32 {
        if now < self.appear_at {
            return 0.0;
        }
        if self.duration.is_zero() || self.entrance == Entrance::None {
            return 1.0;
        }
        let t = ((now - self.appear_at).as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        // cubic ease-out
        1.0 - (1.0 - t).powi(3)
    }

    pub fn is_visible(&self, now: Duration) -> bool { now >= self.appear_at }
}

/// The single chart container. Exclusively written by the controller's collaborators during a render.
#[derive(Clone, Debug)]
pub struct Mount {
    width: i32,
    height: i32,
    elements: Vec<Element>,
    kind: Option<ChartKind>,
    origin: Duration,
    entrance: Duration,
}

impl Mount {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width: width.max(1), height: height.max(1), elements: Vec::new(), kind: None, origin: Duration::ZERO, entrance: Duration::ZERO }
    }

    pub fn width(&self) -> i32 { self.width }
    pub fn height(&self) -> i32 { self.height }
    pub fn elements(&self) -> &[Element] { &self.elements }
    pub fn is_empty(&self) -> bool { self.elements.is_empty() }
    pub fn chart_kind(&self) -> Option<ChartKind> { self.kind }

    /// Remove everything: chart marks, callouts, notices.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.kind = None;
    }

    /// Start a chart render: later [`Mount::draw`] calls are owned by `kind`, appear at `origin`,
    /// and animate over `entrance`.
    pub fn begin_chart(&mut self, kind: ChartKind, origin: Duration, entrance: Duration) {
        self.kind = Some(kind);
        self.origin = origin;
        self.entrance = entrance;
    }

    /// Append a chart element (requires [`Mount::begin_chart`]; otherwise it is owned by a notice).
    pub fn draw(&mut self, shape: Shape, style: Style) -> &mut Element {
        let owner = self.kind.map(Owner::Chart).unwrap_or(Owner::Notice);
        let (origin, entrance) = (self.origin, self.entrance);
        self.draw_owned(owner, shape, style, origin, entrance)
    }

    pub fn draw_owned(&mut self, owner: Owner, shape: Shape, style: Style, appear_at: Duration, duration: Duration) -> &mut Element {
        self.elements.push(Element { owner, shape, style, entrance: Entrance::None, appear_at, duration, tooltip: None });
        let last = self.elements.len() - 1;
        &mut self.elements[last]
    }

    pub fn remove_owner(&mut self, owner: Owner) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| e.owner != owner);
        before - self.elements.len()
    }

    pub fn count_owned(&self, pred: impl Fn(&Owner) -> bool) -> usize {
        self.elements.iter().filter(|e| pred(&e.owner)).count()
    }

    /// Distinct callout ordinals present, ascending.
    pub fn callout_ordinals(&self) -> Vec<usize> {
        let mut v: Vec<usize> = self
            .elements
            .iter()
            .filter_map(|e| match e.owner { Owner::Callout { ordinal } => Some(ordinal), _ => None })
            .collect();
        v.sort_unstable();
        v.dedup();
        v
    }

    /// Replace the content with a centered error message.
    pub fn notice(&mut self, message: &str, color: skia::Color, now: Duration) {
        self.clear();
        let c = Point::new(self.width as f32 * 0.5, self.height as f32 * 0.5);
        let rect = RectF::from_ltrb(c.x - 260.0, c.y - 40.0, c.x + 260.0, c.y + 40.0);
        self.draw_owned(Owner::Notice, Shape::RoundRect { rect, radius: 8.0 }, Style::stroke(color, 2.0), now, Duration::ZERO);
        self.draw_owned(Owner::Notice, Shape::text(c.offset(0.0, 6.0), message, 15.0, Align::Middle), Style::fill(color), now, Duration::ZERO);
    }

    /// Tooltip of the topmost visible element under `(x, y)`.
    pub fn hit_test(&self, x: f32, y: f32, now: Duration) -> Option<&str> {
        let p = Point::new(x, y);
        self.elements
            .iter()
            .rev()
            .filter(|e| e.is_visible(now))
            .find(|e| e.tooltip.is_some() && e.shape.contains(p))
            .and_then(|e| e.tooltip.as_deref())
    }

    /// True once every element has finished its entrance.
    pub fn is_settled(&self, now: Duration) -> bool {
        self.elements.iter().all(|e| e.progress(now) >= 1.0)
    }
}
