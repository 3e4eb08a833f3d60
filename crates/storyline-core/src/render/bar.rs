// File: crates/storyline-core/src/render/bar.rs
// Summary: Categorical bar chart (single column, or the sum of the selected columns).

use crate::dataset::DatasetView;
use crate::error::RenderError;
use crate::geometry::{Point, RectF};
use crate::grid::format_tick;
use crate::mount::{Align, Entrance, Mount, Shape, Style};
use crate::scale::BandScale;
use crate::scene::{ChartKind, Scene};

use super::axes::{draw_band_axis, draw_value_axis, require_rows, unique_categories, value_domain, y_scale};
use super::{ChartRenderer, RenderOptions, Scales, XScale};

const KIND: ChartKind = ChartKind::CategoricalBar;

#[derive(Clone, Copy, Debug, Default)]
pub struct BarRenderer;

impl ChartRenderer for BarRenderer {
    fn render(&self, mount: &mut Mount, view: &DatasetView, scene: &Scene, opts: &RenderOptions) -> Result<Scales, RenderError> {
        require_rows(KIND, view)?;
        let o = &scene.options;
        let mut bars: Vec<(String, f64)> = view
            .records()
            .iter()
            .map(|r| (r.key.label(), if o.sum_columns { view.total(r) } else { view.value(r, 0) }))
            .collect();
        unique_categories(KIND, &bars.iter().map(|b| b.0.clone()).collect::<Vec<_>>())?;
        if o.sort_descending {
            bars.sort_by(|a, b| b.1.total_cmp(&a.1));
        }

        let plot = opts.plot_rect(mount);
        let max = bars.iter().map(|b| b.1).fold(0.0, f64::max);
        let min = bars.iter().map(|b| b.1).fold(0.0, f64::min);
        let y = y_scale(plot, value_domain(scene, min, max));
        let band = BandScale::new(bars.iter().map(|b| b.0.clone()).collect(), (plot.left, plot.right), 0.2);

        draw_value_axis(mount, plot, &y, &opts.theme, scene);
        draw_band_axis(mount, plot, &band, &opts.theme, scene);

        let series_name = if o.sum_columns { "total".to_string() } else { view.column_names()[0].to_string() };
        let base = opts.color_for(scene, &series_name, 0);
        let zero = y.to_px(0.0);
        let stagger = opts.animation / 20;
        let mut scales = Scales::new(plot, XScale::Band(band.clone()), Some(y));

        for (i, (cat, v)) in bars.iter().enumerate() {
            let Some(x) = band.position(cat) else { continue };
            let color = match o.colors.get(cat).and_then(|h| crate::theme::parse_hex(h)) {
                Some(c) => c,
                None if o.highlight.iter().any(|h| h == cat) => opts.theme.accent,
                None => base,
            };
            let top = y.to_px(*v);
            let rect = RectF::from_ltrb(x, top.min(zero), x + band.bandwidth(), top.max(zero));
            mount
                .draw(Shape::Rect(rect), Style::fill(color))
                .with_entrance(Entrance::Grow { baseline: zero })
                .with_tooltip(format!("{cat}: {}", format_tick(*v, &o.unit)))
                .delayed(stagger * i as u32);
            mount
                .draw(
                    Shape::text(Point::new(x + band.bandwidth() * 0.5, top.min(zero) - 6.0), format_tick(*v, ""), 11.0, Align::Middle),
                    Style::fill(opts.theme.text),
                )
                .with_entrance(Entrance::Fade)
                .delayed(opts.animation);
            scales.tops.insert(cat.clone(), *v);
        }
        Ok(scales)
    }
}
