// File: crates/storyline-core/src/render/band.rs
// Summary: Time series with shaded highlight bands (labelled date ranges) behind the line.

use chrono::Datelike;

use crate::dataset::DatasetView;
use crate::error::RenderError;
use crate::geometry::{Point, RectF};
use crate::mount::{Align, Entrance, Mount, Shape, Style};
use crate::scale::day_number;
use crate::scene::{ChartKind, Scene};

use super::axes::{draw_value_axis, require_rows, value_domain, y_scale};
use super::line::{continuous_x, draw_x_for, x_px};
use super::{ChartRenderer, RenderOptions, Scales, XScale};

const KIND: ChartKind = ChartKind::TimeSeriesBand;

#[derive(Clone, Copy, Debug, Default)]
pub struct BandRenderer;

impl ChartRenderer for BandRenderer {
    fn render(&self, mount: &mut Mount, view: &DatasetView, scene: &Scene, opts: &RenderOptions) -> Result<Scales, RenderError> {
        require_rows(KIND, view)?;
        let plot = opts.plot_rect(mount);
        let (x, xs) = continuous_x(KIND, view, plot)?;
        let values: Vec<f64> = view.series(0).map(|(_, v)| v).collect();
        let min = values.iter().copied().fold(0.0, f64::min);
        let max = values.iter().copied().fold(0.0, f64::max);
        let y = y_scale(plot, value_domain(scene, min, max));

        // bands sit underneath the grid and the line
        for band in &scene.options.bands {
            let (a, b) = match &x {
                XScale::Time(_) => (day_number(band.start), day_number(band.end)),
                _ => (band.start.year() as f64, band.end.year() as f64),
            };
            let (l, r) = (x_px(&x, a).max(plot.left), x_px(&x, b).min(plot.right));
            if r <= l {
                tracing::warn!(label = %band.label, "highlight band outside the visible range");
                continue;
            }
            let color = band.color.as_deref().and_then(crate::theme::parse_hex).unwrap_or(opts.theme.accent);
            mount
                .draw(Shape::Rect(RectF::from_ltrb(l, plot.top, r, plot.bottom)), Style::fill(color).with_opacity(0.15))
                .with_entrance(Entrance::Fade);
            if !band.label.is_empty() {
                mount
                    .draw(Shape::text(Point::new((l + r) * 0.5, plot.top + 16.0), band.label.clone(), 11.0, Align::Middle), Style::fill(color))
                    .with_entrance(Entrance::Fade);
            }
        }

        draw_value_axis(mount, plot, &y, &opts.theme, scene);
        draw_x_for(mount, plot, &x, &opts.theme, scene);

        let name = view.column_names()[0].to_string();
        let color = opts.color_for(scene, &name, 0);
        let path: Vec<Point> = xs.iter().zip(&values).map(|(&vx, &vy)| Point::new(x_px(&x, vx), y.to_px(vy))).collect();
        mount.draw(Shape::Polyline(path), Style::stroke(color, 2.0)).with_entrance(Entrance::Draw);

        let mut scales = Scales::new(plot, x, Some(y));
        scales.primary = xs.into_iter().zip(values).collect();
        Ok(scales)
    }
}
