// File: crates/storyline-core/src/frame.rs
// Summary: Frame layout (header, chart area, navigation footer) and the Skia stage that paints a
//          controller snapshot to a CPU raster surface, PNG, or RGBA8 buffer.

use std::time::Duration;

use anyhow::Result;
use skia_safe as skia;

use crate::controller::{NarrativeController, Panel};
use crate::geometry::{Point, RectF, RectI32};
use crate::input::Control;
use crate::mount::{Align, Element, Entrance, Mount, Shape};
use crate::text::TextShaper;
use crate::theme::Theme;

pub const HEADER_HEIGHT: i32 = 110;
pub const FOOTER_HEIGHT: i32 = 70;

const BUTTON_W: i32 = 120;
const BUTTON_H: i32 = 36;
const DOT: i32 = 12;
const DOT_GAP: i32 = 22;

/// Pixel layout of one frame. The chart area is exactly the mount.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameLayout {
    pub width: i32,
    pub height: i32,
    pub header: RectI32,
    pub chart: RectI32,
    pub footer: RectI32,
    pub prev: RectI32,
    pub next: RectI32,
    pub progress: RectI32,
    pub indicators: Vec<RectI32>,
}

impl FrameLayout {
    pub fn new(width: i32, height: i32, total: usize) -> Self {
        let width = width.max(1);
        let height = height.max(HEADER_HEIGHT + FOOTER_HEIGHT + 1);
        let ft = height - FOOTER_HEIGHT;
        let header = RectI32::from_ltrb(0, 0, width, HEADER_HEIGHT);
        let chart = RectI32::from_ltrb(0, HEADER_HEIGHT, width, ft);
        let footer = RectI32::from_ltrb(0, ft, width, height);
        let prev = RectI32::from_ltwh(24, ft + 17, BUTTON_W, BUTTON_H);
        let next = RectI32::from_ltwh(width - 24 - BUTTON_W, ft + 17, BUTTON_W, BUTTON_H);
        let (pl, pr) = (prev.right + 24, (next.left - 24).max(prev.right + 25));
        let progress = RectI32::from_ltrb(pl, ft + 18, pr, ft + 24);

        let span = DOT_GAP * total.saturating_sub(1) as i32;
        let x0 = (pl + pr) / 2 - span / 2;
        let indicators = (0..total)
            .map(|i| {
                let cx = x0 + DOT_GAP * i as i32;
                RectI32::from_ltwh(cx - DOT / 2 - 3, ft + 34, DOT + 6, DOT + 6)
            })
            .collect();
        Self { width, height, header, chart, footer, prev, next, progress, indicators }
    }

    /// Frame around `mount`, which becomes the chart area.
    pub fn for_mount(mount: &Mount, total: usize) -> Self {
        Self::new(mount.width(), mount.height() + HEADER_HEIGHT + FOOTER_HEIGHT, total)
    }

    pub fn chart_size(&self) -> (i32, i32) { (self.chart.width(), self.chart.height()) }

    pub fn hit_control(&self, x: f64, y: f64) -> Option<Control> {
        if self.prev.contains(x, y) {
            return Some(Control::Previous);
        }
        if self.next.contains(x, y) {
            return Some(Control::Next);
        }
        self.indicators.iter().position(|r| r.contains(x, y)).map(Control::Indicator)
    }

    /// Window point to mount coordinates, when inside the chart area.
    pub fn to_mount(&self, x: f64, y: f64) -> Option<(f32, f32)> {
        self.chart
            .contains(x, y)
            .then(|| ((x - self.chart.left as f64) as f32, (y - self.chart.top as f64) as f32))
    }
}

fn rect(r: RectF) -> skia::Rect { skia::Rect::new(r.left, r.top, r.right, r.bottom) }

fn irect(r: RectI32) -> skia::Rect { rect(r.to_rect()) }

fn fade(c: skia::Color, opacity: f32) -> skia::Color {
    c.with_a((c.a() as f32 * opacity.clamp(0.0, 1.0)).round() as u8)
}

fn fill_paint(c: skia::Color) -> skia::Paint {
    let mut p = skia::Paint::default();
    p.set_anti_alias(true);
    p.set_color(c);
    p.set_style(skia::paint::Style::Fill);
    p
}

fn stroke_paint(c: skia::Color, width: f32, dashed: bool) -> skia::Paint {
    let mut p = fill_paint(c);
    p.set_style(skia::paint::Style::Stroke);
    p.set_stroke_width(width);
    if dashed {
        p.set_path_effect(skia::PathEffect::dash(&[6.0, 4.0], 0.0));
    }
    p
}

/// Leading `t` fraction of a polyline, by length.
fn partial_polyline(points: &[Point], t: f32) -> Vec<Point> {
    if t >= 1.0 || points.len() < 2 {
        return points.to_vec();
    }
    let total: f32 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    let mut left = total * t.max(0.0);
    let mut out = vec![points[0]];
    for w in points.windows(2) {
        let d = w[0].distance(w[1]);
        if d >= left {
            let k = if d > 0.0 { left / d } else { 0.0 };
            out.push(Point::new(w[0].x + (w[1].x - w[0].x) * k, w[0].y + (w[1].y - w[0].y) * k));
            break;
        }
        left -= d;
        out.push(w[1]);
    }
    out
}

fn wedge_path(center: Point, outer: f32, inner: f32, start: f32, sweep: f32) -> skia::Path {
    let oval = |r: f32| skia::Rect::new(center.x - r, center.y - r, center.x + r, center.y + r);
    let mut path = skia::Path::new();
    if inner <= 0.0 {
        path.move_to((center.x, center.y));
        path.arc_to(oval(outer), start, sweep, false);
    } else {
        path.arc_to(oval(outer), start, sweep, true);
        path.arc_to(oval(inner), start + sweep, -sweep, false);
    }
    path.close();
    path
}

/// Paints frames with one theme and one text shaper.
pub struct Stage {
    pub theme: Theme,
    shaper: TextShaper,
}

impl Stage {
    pub fn new(theme: Theme) -> Self { Self { theme, shaper: TextShaper::new() } }

    /// Whole frame: header, mount (as of `now`), footer.
    pub fn paint(&self, canvas: &skia::Canvas, layout: &FrameLayout, controller: &NarrativeController, now: Duration) {
        canvas.clear(self.theme.background);
        let panel = controller.panel();
        self.paint_header(canvas, layout, &panel);

        canvas.save();
        canvas.clip_rect(irect(layout.chart), None, Some(true));
        canvas.translate((layout.chart.left as f32, layout.chart.top as f32));
        self.paint_mount(canvas, controller.mount(), now);
        canvas.restore();

        self.paint_footer(canvas, layout, &panel);
    }

    fn paint_header(&self, canvas: &skia::Canvas, layout: &FrameLayout, panel: &Panel<'_>) {
        let t = &self.theme;
        canvas.draw_rect(irect(layout.header), &fill_paint(t.panel));
        let x = 24.0;
        if !panel.narrative.is_empty() {
            self.shaper.draw_line(canvas, &panel.narrative.to_uppercase(), x, 26.0, 11.0, t.muted, true, Align::Start);
        }
        self.shaper.draw_line(canvas, panel.title, x, 54.0, 22.0, t.title, true, Align::Start);
        self.shaper.draw_wrapped(canvas, panel.description, x, 64.0, layout.width as f32 - 2.0 * x, 14.0, t.text);
    }

    fn paint_footer(&self, canvas: &skia::Canvas, layout: &FrameLayout, panel: &Panel<'_>) {
        let t = &self.theme;
        canvas.draw_rect(irect(layout.footer), &fill_paint(t.panel));

        for (r, label, enabled) in [(layout.prev, "< Previous", panel.prev_enabled), (layout.next, "Next >", panel.next_enabled)] {
            let bg = if enabled { t.button } else { t.button_disabled };
            canvas.draw_round_rect(irect(r), 6.0, 6.0, &fill_paint(bg));
            let fg = if enabled { t.button_text } else { t.muted };
            let c = r.to_rect().center();
            self.shaper.draw_line(canvas, label, c.x, c.y + 5.0, 14.0, fg, true, Align::Middle);
        }

        let track = layout.progress.to_rect();
        canvas.draw_round_rect(rect(track), 3.0, 3.0, &fill_paint(t.progress_track));
        let filled = RectF::from_ltrb(track.left, track.top, track.left + track.width() * (panel.progress_percent / 100.0) as f32, track.bottom);
        canvas.draw_round_rect(rect(filled), 3.0, 3.0, &fill_paint(t.accent));
        let caption = format!("Scene {} of {}", panel.index + 1, panel.total);
        self.shaper.draw_line(canvas, &caption, track.right, track.top - 4.0, 11.0, t.muted, false, Align::End);

        for (i, r) in layout.indicators.iter().enumerate() {
            let c = r.to_rect().center();
            let color = if i == panel.index { t.accent } else { t.progress_track };
            canvas.draw_circle((c.x, c.y), DOT as f32 * 0.5, &fill_paint(color));
        }
    }

    /// Mount content at `now`, in mount coordinates.
    pub fn paint_mount(&self, canvas: &skia::Canvas, mount: &Mount, now: Duration) {
        for e in mount.elements().iter().filter(|e| e.is_visible(now)) {
            self.paint_element(canvas, e, e.progress(now));
        }
    }

    fn paint_element(&self, canvas: &skia::Canvas, e: &Element, p: f32) {
        let mut opacity = e.style.opacity;
        let mut lift = 0.0;
        if e.entrance == Entrance::Fade {
            opacity *= p;
            lift = (1.0 - p) * 8.0;
        }
        if opacity <= 0.0 {
            return;
        }
        canvas.save();
        canvas.translate((0.0, lift));
        let fill = e.style.fill.map(|c| fill_paint(fade(c, opacity)));
        let stroke = |dashed: bool| e.style.stroke.map(|c| stroke_paint(fade(c, opacity), e.style.stroke_width, dashed));

        match &e.shape {
            Shape::Rect(r) | Shape::RoundRect { rect: r, .. } => {
                let mut r = *r;
                if let Entrance::Grow { baseline } = e.entrance {
                    r.top = baseline + (r.top - baseline) * p;
                    r.bottom = baseline + (r.bottom - baseline) * p;
                }
                let radius = match &e.shape { Shape::RoundRect { radius, .. } => *radius, _ => 0.0 };
                for paint in [fill, stroke(false)].into_iter().flatten() {
                    if radius > 0.0 {
                        canvas.draw_round_rect(rect(r.sorted()), radius, radius, &paint);
                    } else {
                        canvas.draw_rect(rect(r.sorted()), &paint);
                    }
                }
            }
            Shape::Line { from, to, dashed } => {
                if let Some(paint) = stroke(*dashed) {
                    canvas.draw_line((from.x, from.y), (to.x, to.y), &paint);
                }
            }
            Shape::Polyline(points) => {
                let pts = if e.entrance == Entrance::Draw { partial_polyline(points, p) } else { points.clone() };
                if let (Some(first), Some(paint)) = (pts.first(), stroke(false)) {
                    let mut path = skia::Path::new();
                    path.move_to((first.x, first.y));
                    for q in pts.iter().skip(1) {
                        path.line_to((q.x, q.y));
                    }
                    canvas.draw_path(&path, &paint);
                }
            }
            Shape::Circle { center, radius } => {
                let r = if e.entrance == Entrance::Pop { radius * p } else { *radius };
                for paint in [fill, stroke(false)].into_iter().flatten() {
                    canvas.draw_circle((center.x, center.y), r, &paint);
                }
            }
            Shape::Wedge { center, outer, inner, start, sweep } => {
                let s = if e.entrance == Entrance::Sweep { sweep * p } else { *sweep };
                let path = wedge_path(*center, *outer, *inner, *start, s);
                for paint in [fill, stroke(false)].into_iter().flatten() {
                    canvas.draw_path(&path, &paint);
                }
            }
            Shape::Text { pos, text, size, align, rotate, bold } => {
                let color = fade(e.style.fill.unwrap_or(self.theme.text), opacity);
                if *rotate != 0.0 {
                    canvas.rotate(*rotate, Some(skia::Point::new(pos.x, pos.y)));
                }
                self.shaper.draw_line(canvas, text, pos.x, pos.y, *size, color, *bold, *align);
            }
        }
        canvas.restore();
    }

    fn raster(&self, controller: &NarrativeController, now: Duration) -> Result<(skia::Surface, FrameLayout)> {
        let layout = FrameLayout::for_mount(controller.mount(), controller.state().total());
        let mut surface = skia::surfaces::raster_n32_premul((layout.width, layout.height))
            .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
        self.paint(surface.canvas(), &layout, controller, now);
        Ok((surface, layout))
    }

    pub fn render_png_bytes(&self, controller: &NarrativeController, now: Duration) -> Result<Vec<u8>> {
        let (mut surface, _) = self.raster(controller, now)?;
        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
        Ok(data.as_bytes().to_vec())
    }

    pub fn render_png(&self, controller: &NarrativeController, now: Duration, path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.render_png_bytes(controller, now)?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Unpremultiplied RGBA8 pixels, row-major, plus the frame size.
    pub fn render_rgba8(&self, controller: &NarrativeController, now: Duration) -> Result<(Vec<u8>, i32, i32)> {
        let (mut surface, layout) = self.raster(controller, now)?;
        let (w, h) = (layout.width, layout.height);
        let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
        let row_bytes = w as usize * 4;
        let mut pixels = vec![0u8; row_bytes * h as usize];
        if !surface.read_pixels(&info, &mut pixels, row_bytes, (0, 0)) {
            anyhow::bail!("reading {w}x{h} pixels back from the raster surface failed");
        }
        Ok((pixels, w, h))
    }
}
