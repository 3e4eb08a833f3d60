// File: crates/storyline-core/src/render/stacked.rs
// Summary: Stacked bars; one bar per record, one segment per selected column, legend on the right.

use crate::dataset::DatasetView;
use crate::error::RenderError;
use crate::geometry::RectF;
use crate::grid::format_tick;
use crate::mount::{Entrance, Mount, Shape, Style};
use crate::scale::BandScale;
use crate::scene::{ChartKind, Scene};

use super::axes::{draw_band_axis, draw_legend, draw_value_axis, require_rows, shape_err, unique_categories, value_domain, y_scale};
use super::{ChartRenderer, RenderOptions, Scales, XScale};

const KIND: ChartKind = ChartKind::StackedBar;

#[derive(Clone, Copy, Debug, Default)]
pub struct StackedBarRenderer;

impl ChartRenderer for StackedBarRenderer {
    fn render(&self, mount: &mut Mount, view: &DatasetView, scene: &Scene, opts: &RenderOptions) -> Result<Scales, RenderError> {
        require_rows(KIND, view)?;
        let series: Vec<String> = view.column_names().into_iter().map(str::to_string).collect();
        let records = view.records();
        if records.iter().any(|r| (0..series.len()).any(|c| view.value(r, c) < 0.0)) {
            return Err(shape_err(KIND, "negative values cannot be stacked"));
        }

        let plot = opts.plot_rect(mount);
        let max = records.iter().map(|r| view.total(r)).fold(0.0, f64::max);
        let y = y_scale(plot, value_domain(scene, 0.0, max));
        let labels: Vec<String> = records.iter().map(|r| r.key.label()).collect();
        unique_categories(KIND, &labels)?;
        let band = BandScale::new(labels, (plot.left, plot.right), 0.25);

        draw_value_axis(mount, plot, &y, &opts.theme, scene);
        draw_band_axis(mount, plot, &band, &opts.theme, scene);
        let legend: Vec<_> = series.iter().enumerate().map(|(i, s)| (s.clone(), opts.color_for(scene, s, i))).collect();
        draw_legend(mount, plot, &legend, &opts.theme);

        let zero = y.to_px(0.0);
        let stagger = opts.animation / 20;
        let mut scales = Scales::new(plot, XScale::Band(band.clone()), Some(y));
        for (i, r) in records.iter().enumerate() {
            let cat = r.key.label();
            let Some(x) = band.position(&cat) else { continue };
            let mut acc = 0.0;
            for (c, (name, color)) in legend.iter().enumerate() {
                let v = view.value(r, c);
                let rect = RectF::from_ltrb(x, y.to_px(acc + v), x + band.bandwidth(), y.to_px(acc));
                acc += v;
                mount
                    .draw(Shape::Rect(rect), Style::fill(*color))
                    .with_entrance(Entrance::Grow { baseline: zero })
                    .with_tooltip(format!("{cat} {name}: {}", format_tick(v, &scene.options.unit)))
                    .delayed(stagger * i as u32);
            }
            scales.tops.insert(cat, acc);
        }
        Ok(scales)
    }
}
