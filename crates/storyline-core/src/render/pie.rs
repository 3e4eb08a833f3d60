// File: crates/storyline-core/src/render/pie.rs
// Summary: Pie/donut chart of the first selected column; slices start at 12 o'clock, clockwise.

use crate::dataset::DatasetView;
use crate::error::RenderError;
use crate::geometry::Point;
use crate::grid::format_tick;
use crate::mount::{Align, Entrance, Mount, Shape, Style};
use crate::scene::{ChartKind, Scene};

use super::axes::{draw_legend, require_rows, shape_err};
use super::{ChartRenderer, RadialLayout, RenderOptions, Scales, SliceGeom, XScale};

const KIND: ChartKind = ChartKind::Pie;
/// Slices narrower than this (degrees) get no percentage label.
const MIN_LABEL_SWEEP: f32 = 14.0;

#[derive(Clone, Copy, Debug, Default)]
pub struct PieRenderer;

impl ChartRenderer for PieRenderer {
    fn render(&self, mount: &mut Mount, view: &DatasetView, scene: &Scene, opts: &RenderOptions) -> Result<Scales, RenderError> {
        require_rows(KIND, view)?;
        let parts: Vec<(String, f64)> = view.series(0).map(|(k, v)| (k.label(), v)).collect();
        if parts.iter().any(|p| p.1 < 0.0 || !p.1.is_finite()) {
            return Err(shape_err(KIND, "slice values must be finite and non-negative"));
        }
        let total: f64 = parts.iter().map(|p| p.1).sum();
        if total <= 0.0 {
            return Err(shape_err(KIND, "slice values sum to zero"));
        }

        let plot = opts.plot_rect(mount);
        let center = plot.center();
        let outer = (plot.width().min(plot.height()) * 0.5 - 8.0).max(10.0);
        let inner = outer * scene.options.donut.unwrap_or(0.0).clamp(0.0, 0.9);

        let legend: Vec<_> = parts.iter().enumerate().map(|(i, (k, _))| (k.clone(), opts.color_for(scene, k, i))).collect();
        draw_legend(mount, plot, &legend, &opts.theme);

        let mut start = -90.0f32;
        let mut slices = Vec::with_capacity(parts.len());
        for ((key, v), (_, color)) in parts.iter().zip(&legend) {
            let sweep = (v / total * 360.0) as f32;
            let pct = v / total * 100.0;
            mount
                .draw(Shape::Wedge { center, outer, inner, start, sweep }, Style::fill(*color).with_stroke(opts.theme.background, 1.5))
                .with_entrance(Entrance::Sweep)
                .with_tooltip(format!("{key}: {} ({}%)", format_tick(*v, &scene.options.unit), format_tick(pct, "")));
            slices.push(SliceGeom { key: key.clone(), start, sweep });
            start += sweep;
        }

        let layout = RadialLayout { center, outer, inner, slices };
        for s in &layout.slices {
            if s.sweep < MIN_LABEL_SWEEP {
                continue;
            }
            let Some(p) = layout.centroid(&s.key) else { continue };
            let pct = s.sweep / 360.0 * 100.0;
            mount
                .draw(Shape::text(Point::new(p.x, p.y + 4.0), format!("{pct:.0}%"), 12.0, Align::Middle), Style::fill(opts.theme.button_text))
                .with_entrance(Entrance::Fade)
                .delayed(opts.animation);
        }

        let mut scales = Scales::new(plot, XScale::None, None);
        scales.radial = Some(layout);
        Ok(scales)
    }
}
