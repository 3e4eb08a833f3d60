// File: crates/storyline-core/src/render/axes.rs
// Summary: Shared chart furniture: value grid, axis lines and ticks, axis titles, legend.

use skia_safe as skia;

use crate::dataset::DatasetView;
use crate::error::RenderError;
use crate::geometry::{Point, RectF};
use crate::grid::{format_tick, nice_max, nice_step, nice_ticks};
use crate::mount::{Align, Mount, Shape, Style};
use crate::scale::{BandScale, LinearScale, TimeScale};
use crate::scene::{ChartKind, Scene};
use crate::theme::Theme;

const TICK_SIZE: f32 = 11.0;
const TITLE_SIZE: f32 = 13.0;

pub(crate) fn require_rows(kind: ChartKind, view: &DatasetView) -> Result<(), RenderError> {
    if view.is_empty() || view.column_count() == 0 {
        return Err(RenderError::EmptyData(kind));
    }
    Ok(())
}

pub(crate) fn shape_err(kind: ChartKind, reason: impl Into<String>) -> RenderError {
    RenderError::Shape { kind, reason: reason.into() }
}

/// Band categories must be unique: duplicates would share one band and one top.
pub(crate) fn unique_categories(kind: ChartKind, labels: &[String]) -> Result<(), RenderError> {
    let mut seen = std::collections::HashSet::new();
    match labels.iter().find(|l| !seen.insert(l.as_str())) {
        Some(dup) => Err(shape_err(kind, format!("duplicate category '{dup}'"))),
        None => Ok(()),
    }
}

/// Value domain `[lo, hi]` with nice bounds; zero-based unless the data goes negative.
pub(crate) fn value_domain(scene: &Scene, min: f64, max: f64) -> (f64, f64) {
    let hi = scene.options.y_max.unwrap_or_else(|| nice_max(max, 5));
    let lo = if min < 0.0 { -nice_max(-min, 5) } else { 0.0 };
    (lo, hi.max(lo + f64::EPSILON))
}

/// y scale with ticks on the domain's nice step.
pub(crate) fn y_scale(plot: RectF, domain: (f64, f64)) -> LinearScale {
    LinearScale::new(domain, (plot.bottom, plot.top))
}

/// Horizontal grid lines with tick labels, the left axis line, and the rotated y title.
pub(crate) fn draw_value_axis(mount: &mut Mount, plot: RectF, y: &LinearScale, theme: &Theme, scene: &Scene) {
    let (d0, d1) = y.domain();
    for v in nice_ticks(d0, d1, 5) {
        let py = y.to_px(v);
        mount.draw(
            Shape::Line { from: Point::new(plot.left, py), to: Point::new(plot.right, py), dashed: false },
            Style::stroke(theme.grid, 1.0),
        );
        mount.draw(
            Shape::text(Point::new(plot.left - 8.0, py + 4.0), format_tick(v, &scene.options.unit), TICK_SIZE, Align::End),
            Style::fill(theme.axis_label),
        );
    }
    if d0 < 0.0 && d1 > 0.0 {
        let py = y.to_px(0.0);
        mount.draw(
            Shape::Line { from: Point::new(plot.left, py), to: Point::new(plot.right, py), dashed: true },
            Style::stroke(theme.axis_line, 1.0),
        );
    }
    mount.draw(
        Shape::Line { from: Point::new(plot.left, plot.top), to: Point::new(plot.left, plot.bottom), dashed: false },
        Style::stroke(theme.axis_line, 1.5),
    );
    if !scene.options.y_label.is_empty() {
        mount.draw(
            Shape::Text {
                pos: Point::new(plot.left - 52.0, plot.center().y),
                text: scene.options.y_label.clone(),
                size: TITLE_SIZE,
                align: Align::Middle,
                rotate: -90.0,
                bold: false,
            },
            Style::fill(theme.text),
        );
    }
}

fn draw_baseline(mount: &mut Mount, plot: RectF, theme: &Theme) {
    mount.draw(
        Shape::Line { from: Point::new(plot.left, plot.bottom), to: Point::new(plot.right, plot.bottom), dashed: false },
        Style::stroke(theme.axis_line, 1.5),
    );
}

fn draw_x_title(mount: &mut Mount, plot: RectF, theme: &Theme, scene: &Scene) {
    if scene.options.x_label.is_empty() {
        return;
    }
    mount.draw(
        Shape::text(Point::new(plot.center().x, plot.bottom + 46.0), scene.options.x_label.clone(), TITLE_SIZE, Align::Middle),
        Style::fill(theme.text),
    );
}

/// Category labels under each band; slanted when the bands get narrow.
pub(crate) fn draw_band_axis(mount: &mut Mount, plot: RectF, band: &BandScale, theme: &Theme, scene: &Scene) {
    draw_baseline(mount, plot, theme);
    let slant = band.bandwidth() < 60.0;
    for cat in band.categories() {
        let Some(cx) = band.center(cat) else { continue };
        let shape = if slant {
            Shape::Text { pos: Point::new(cx + 4.0, plot.bottom + 14.0), text: cat.clone(), size: TICK_SIZE, align: Align::End, rotate: -30.0, bold: false }
        } else {
            Shape::text(Point::new(cx, plot.bottom + 18.0), cat.clone(), TICK_SIZE, Align::Middle)
        };
        mount.draw(shape, Style::fill(theme.axis_label));
    }
    draw_x_title(mount, plot, theme, scene);
}

/// Numeric x ticks with short vertical marks. Year-like domains are labelled without separators.
pub(crate) fn draw_linear_x_axis(mount: &mut Mount, plot: RectF, x: &LinearScale, theme: &Theme, scene: &Scene, suffix: &str) {
    draw_baseline(mount, plot, theme);
    let (d0, d1) = x.domain();
    let ticks: Vec<f64> = if d0 >= 1000.0 && d1 - d0 <= 40.0 {
        // small year spans: every year, or every other one
        let step = if d1 - d0 > 12.0 { 2.0 } else { 1.0 };
        let mut v = d0.ceil();
        let mut out = Vec::new();
        while v <= d1 {
            out.push(v);
            v += step;
        }
        out
    } else {
        nice_ticks(d0, d1, 6)
    };
    for v in ticks {
        let px = x.to_px(v);
        mount.draw(
            Shape::Line { from: Point::new(px, plot.bottom), to: Point::new(px, plot.bottom + 5.0), dashed: false },
            Style::stroke(theme.axis_line, 1.0),
        );
        mount.draw(
            Shape::text(Point::new(px, plot.bottom + 20.0), format_tick(v, suffix), TICK_SIZE, Align::Middle),
            Style::fill(theme.axis_label),
        );
    }
    draw_x_title(mount, plot, theme, scene);
}

pub(crate) fn draw_time_axis(mount: &mut Mount, plot: RectF, t: &TimeScale, theme: &Theme, scene: &Scene) {
    draw_baseline(mount, plot, theme);
    let count = ((plot.width() / 90.0) as usize).max(2);
    for d in t.year_ticks(count) {
        let px = t.to_px(d);
        mount.draw(
            Shape::Line { from: Point::new(px, plot.bottom), to: Point::new(px, plot.bottom + 5.0), dashed: false },
            Style::stroke(theme.axis_line, 1.0),
        );
        mount.draw(
            Shape::text(Point::new(px, plot.bottom + 20.0), d.format("%Y").to_string(), TICK_SIZE, Align::Middle),
            Style::fill(theme.axis_label),
        );
    }
    draw_x_title(mount, plot, theme, scene);
}

/// Swatch + name rows in the right margin.
pub(crate) fn draw_legend(mount: &mut Mount, plot: RectF, entries: &[(String, skia::Color)], theme: &Theme) {
    let x = plot.right + 14.0;
    for (i, (name, color)) in entries.iter().enumerate() {
        let y = plot.top + 6.0 + i as f32 * 20.0;
        mount.draw(Shape::Rect(RectF::from_ltrb(x, y, x + 12.0, y + 12.0)), Style::fill(*color));
        mount.draw(Shape::text(Point::new(x + 18.0, y + 10.5), name.clone(), TICK_SIZE, Align::Start), Style::fill(theme.text));
    }
}

/// Expanded continuous domain for a scatter axis: zero-based, padded to the next nice step.
pub(crate) fn padded_domain(min: f64, max: f64) -> (f64, f64) {
    let lo = if min >= 0.0 { 0.0 } else { min - nice_step(max - min, 5) };
    (lo, nice_max(max * 1.05, 5))
}
