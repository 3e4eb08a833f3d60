// File: crates/storyline-core/src/render/line.rs
// Summary: Single- and multi-series line charts over numeric or date keys.

use crate::dataset::{DatasetView, Key};
use crate::error::RenderError;
use crate::geometry::{Point, RectF};
use crate::grid::format_tick;
use crate::mount::{Entrance, Mount, Shape, Style};
use crate::scale::{LinearScale, TimeScale};
use crate::scene::{ChartKind, Scene};
use crate::theme::Theme;

use super::axes::{draw_legend, draw_linear_x_axis, draw_time_axis, draw_value_axis, require_rows, shape_err, value_domain, y_scale};
use super::{ChartRenderer, RenderOptions, Scales, XScale};

/// Dots (and their tooltips) are only drawn on sparse series.
const MAX_DOTS: usize = 40;

#[derive(Clone, Copy, Debug, Default)]
pub struct LineRenderer {
    /// Draw every selected column; otherwise only the first.
    pub multi: bool,
}

impl LineRenderer {
    fn kind(&self) -> ChartKind {
        if self.multi { ChartKind::MultiLine } else { ChartKind::SingleLine }
    }
}

/// Continuous x for numeric or date keyed views: the scale plus each record's data-space x.
pub(crate) fn continuous_x(kind: ChartKind, view: &DatasetView, plot: RectF) -> Result<(XScale, Vec<f64>), RenderError> {
    let recs = view.records();
    let xs: Vec<f64> = recs.iter().filter_map(|r| r.key.as_f64()).collect();
    if xs.len() != recs.len() {
        return Err(shape_err(kind, "needs numeric or date keys"));
    }
    let (lo, hi) = (xs[0], xs[xs.len() - 1]);
    if view.all_dates() {
        let (Key::Date(a), Key::Date(b)) = (&recs[0].key, &recs[recs.len() - 1].key) else {
            return Err(shape_err(kind, "needs numeric or date keys"));
        };
        return Ok((XScale::Time(TimeScale::new((*a, *b), (plot.left, plot.right))), xs));
    }
    Ok((XScale::Linear(LinearScale::new((lo, hi), (plot.left, plot.right))), xs))
}

pub(crate) fn draw_x_for(mount: &mut Mount, plot: RectF, x: &XScale, theme: &Theme, scene: &Scene) {
    match x {
        XScale::Time(t) => draw_time_axis(mount, plot, t, theme, scene),
        XScale::Linear(l) => draw_linear_x_axis(mount, plot, l, theme, scene, ""),
        _ => {}
    }
}

pub(crate) fn x_px(x: &XScale, v: f64) -> f32 {
    match x {
        XScale::Time(t) => t.linear.to_px(v),
        XScale::Linear(l) => l.to_px(v),
        _ => 0.0,
    }
}

impl ChartRenderer for LineRenderer {
    fn render(&self, mount: &mut Mount, view: &DatasetView, scene: &Scene, opts: &RenderOptions) -> Result<Scales, RenderError> {
        let kind = self.kind();
        require_rows(kind, view)?;
        let plot = opts.plot_rect(mount);
        let (x, xs) = continuous_x(kind, view, plot)?;

        let names = view.column_names();
        let cols = if self.multi { names.len() } else { 1 };
        let (mut min, mut max) = (0.0f64, 0.0f64);
        for c in 0..cols {
            for (_, v) in view.series(c) {
                min = min.min(v);
                max = max.max(v);
            }
        }
        let y = y_scale(plot, value_domain(scene, min, max));

        draw_value_axis(mount, plot, &y, &opts.theme, scene);
        draw_x_for(mount, plot, &x, &opts.theme, scene);
        let legend: Vec<_> = names[..cols]
            .iter()
            .enumerate()
            .map(|(i, s)| (s.to_string(), opts.color_for(scene, s, i)))
            .collect();
        if self.multi {
            draw_legend(mount, plot, &legend, &opts.theme);
        }

        let dots = view.len() <= MAX_DOTS;
        let stagger = opts.animation / (view.len() as u32).max(1);
        for (c, (name, color)) in legend.iter().enumerate() {
            let values: Vec<f64> = view.series(c).map(|(_, v)| v).collect();
            let path: Vec<Point> = xs.iter().zip(&values).map(|(&vx, &vy)| Point::new(x_px(&x, vx), y.to_px(vy))).collect();
            mount.draw(Shape::Polyline(path.clone()), Style::stroke(*color, 2.5)).with_entrance(Entrance::Draw);
            if !dots {
                continue;
            }
            for (i, (p, r)) in path.iter().zip(view.records()).enumerate() {
                mount
                    .draw(Shape::Circle { center: *p, radius: 4.0 }, Style::fill(*color).with_stroke(opts.theme.background, 1.0))
                    .with_entrance(Entrance::Pop)
                    .with_tooltip(format!("{name} {}: {}", r.key, format_tick(values[i], &scene.options.unit)))
                    .delayed(stagger * i as u32);
            }
        }

        let mut scales = Scales::new(plot, x, Some(y));
        scales.primary = xs.iter().copied().zip(view.series(0).map(|(_, v)| v)).collect();
        Ok(scales)
    }
}
