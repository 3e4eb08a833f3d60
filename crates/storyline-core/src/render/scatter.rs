// File: crates/storyline-core/src/render/scatter.rs
// Summary: Scatter plot; first selected column on x, second on y, one point per record.

use crate::dataset::DatasetView;
use crate::error::RenderError;
use crate::geometry::Point;
use crate::grid::format_tick;
use crate::mount::{Align, Entrance, Mount, Shape, Style};
use crate::scale::LinearScale;
use crate::scene::{ChartKind, Scene};

use super::axes::{draw_linear_x_axis, draw_value_axis, padded_domain, require_rows, shape_err};
use super::{ChartRenderer, RenderOptions, Scales, XScale};

const KIND: ChartKind = ChartKind::Scatter;

#[derive(Clone, Copy, Debug, Default)]
pub struct ScatterRenderer;

impl ChartRenderer for ScatterRenderer {
    fn render(&self, mount: &mut Mount, view: &DatasetView, scene: &Scene, opts: &RenderOptions) -> Result<Scales, RenderError> {
        require_rows(KIND, view)?;
        if view.column_count() < 2 {
            return Err(shape_err(KIND, format!("needs two value columns, got {}", view.column_count())));
        }
        let names = view.column_names();
        let pts: Vec<(String, f64, f64)> = view.records().iter().map(|r| (r.key.label(), view.value(r, 0), view.value(r, 1))).collect();
        let (xmin, xmax) = pts.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.1), hi.max(p.1)));
        let (ymin, ymax) = pts.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.2), hi.max(p.2)));

        let plot = opts.plot_rect(mount);
        let x = LinearScale::new(padded_domain(xmin, xmax), (plot.left, plot.right));
        let y_domain = match scene.options.y_max {
            Some(m) => (padded_domain(ymin, ymax).0, m),
            None => padded_domain(ymin, ymax),
        };
        let y = LinearScale::new(y_domain, (plot.bottom, plot.top));

        draw_value_axis(mount, plot, &y, &opts.theme, scene);
        draw_linear_x_axis(mount, plot, &x, &opts.theme, scene, &scene.options.unit);

        let stagger = opts.animation / 25;
        let mut scales = Scales::new(plot, XScale::Linear(x), Some(y));
        for (i, (label, vx, vy)) in pts.iter().enumerate() {
            let center = Point::new(x.to_px(*vx), y.to_px(*vy));
            let color = if scene.options.highlight.iter().any(|h| h == label) {
                opts.theme.accent
            } else {
                opts.color_for(scene, label, i)
            };
            mount
                .draw(Shape::Circle { center, radius: 7.0 }, Style::fill(color).with_stroke(opts.theme.background, 1.5).with_opacity(0.85))
                .with_entrance(Entrance::Pop)
                .with_tooltip(format!(
                    "{label}: {} {}, {} {}",
                    format_tick(*vx, &scene.options.unit),
                    names[0],
                    format_tick(*vy, &scene.options.unit),
                    names[1]
                ))
                .delayed(stagger * i as u32);
            if scene.options.point_labels {
                mount
                    .draw(Shape::text(center.offset(10.0, 4.0), label.clone(), 11.0, Align::Start), Style::fill(opts.theme.text))
                    .with_entrance(Entrance::Fade)
                    .delayed(opts.animation);
            }
            scales.points.insert(label.clone(), center);
        }
        Ok(scales)
    }
}
