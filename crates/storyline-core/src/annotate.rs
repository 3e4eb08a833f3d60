// File: crates/storyline-core/src/annotate.rs
// Summary: Annotation placement. Resolves an anchor through the chart scales and draws a callout
//          (marker, leader line, label box) owned by its ordinal.

use std::time::Duration;

use crate::geometry::{clamp, Point, RectF};
use crate::mount::{Align, Entrance, Mount, Owner, Shape, Style};
use crate::render::Scales;
use crate::scene::Annotation;
use crate::theme::Theme;

/// Draws annotation `ordinal` of the active scene. Placing the same ordinal twice replaces it.
pub trait AnnotationPlacer {
    /// Returns `false` when the anchor does not resolve on this chart; nothing is drawn then.
    fn place(&self, mount: &mut Mount, scales: &Scales, ordinal: usize, annotation: &Annotation, appear_at: Duration) -> bool;
}

#[derive(Clone, Debug)]
pub struct CalloutPlacer {
    pub fade: Duration,
    pub theme: Theme,
    pub text_size: f32,
}

impl CalloutPlacer {
    pub fn new(theme: Theme, fade: Duration) -> Self { Self { fade, theme, text_size: 13.0 } }

    /// Label box for `text` next to `p`, kept inside the mount.
    fn label_box(&self, mount: &Mount, p: Point, text: &str, dx: f32, dy: f32) -> RectF {
        // approximate advance; the painter shapes the real glyphs
        let w = text.chars().count() as f32 * self.text_size * 0.55 + 20.0;
        let h = self.text_size + 14.0;
        let cx = p.x + dx;
        let cy = p.y + dy;
        let left = clamp(cx - w * 0.5, 4.0, (mount.width() as f32 - w - 4.0).max(4.0));
        let top = clamp(cy - h * 0.5, 4.0, (mount.height() as f32 - h - 4.0).max(4.0));
        RectF::from_ltrb(left, top, left + w, top + h)
    }
}

impl AnnotationPlacer for CalloutPlacer {
    fn place(&self, mount: &mut Mount, scales: &Scales, ordinal: usize, annotation: &Annotation, appear_at: Duration) -> bool {
        mount.remove_owner(Owner::Callout { ordinal });
        let Some(p) = scales.resolve(&annotation.anchor) else {
            tracing::warn!(ordinal, anchor = ?annotation.anchor, "annotation anchor does not resolve on this chart; skipped");
            return false;
        };
        let accent = annotation
            .style
            .color
            .as_deref()
            .and_then(crate::theme::parse_hex)
            .unwrap_or(self.theme.accent);
        let owner = Owner::Callout { ordinal };
        let rect = self.label_box(mount, p, &annotation.text, annotation.style.dx, annotation.style.dy);

        // leader runs to the nearest horizontal edge of the box
        let edge_y = if p.y < rect.top { rect.top } else if p.y > rect.bottom { rect.bottom } else { rect.center().y };
        let to = Point::new(clamp(p.x, rect.left, rect.right), edge_y);
        let mut add = |shape: Shape, style: Style| {
            mount.draw_owned(owner, shape, style, appear_at, self.fade).with_entrance(Entrance::Fade);
        };
        add(Shape::Line { from: p, to, dashed: false }, Style::stroke(accent, 1.5));
        add(Shape::Circle { center: p, radius: 4.0 }, Style::fill(accent));
        add(Shape::RoundRect { rect, radius: 6.0 }, Style::fill(self.theme.callout_fill).with_stroke(accent, 1.5));
        add(
            Shape::text(Point::new(rect.center().x, rect.bottom - 9.0), annotation.text.clone(), self.text_size, Align::Middle),
            Style::fill(self.theme.callout_text),
        );
        tracing::debug!(ordinal, x = p.x, y = p.y, "annotation placed");
        true
    }
}
