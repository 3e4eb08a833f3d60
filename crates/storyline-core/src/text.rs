// File: crates/storyline-core/src/text.rs
// Summary: Text shaper/renderer using Skia textlayout; used for labels, callouts, and the scene header.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextAlign, TextStyle};

use crate::mount::Align;

pub struct TextShaper {
    fonts: FontCollection,
}

impl Default for TextShaper {
    fn default() -> Self { Self::new() }
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        // Use system manager fallback
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn make_style(size: f32, color: skia::Color, bold: bool) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size(size.max(1.0));
        ts.set_color(color);
        ts.set_font_families(&["Segoe UI", "Arial", "Helvetica", "Roboto", "DejaVu Sans", "sans-serif"]);
        if bold {
            ts.set_font_style(skia::FontStyle::bold());
        }
        ts
    }

    pub fn layout(&self, text: &str, size: f32, color: skia::Color, bold: bool, max_width: f32, align: TextAlign) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(align);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        let style = Self::make_style(size, color, bold);
        builder.push_style(&style);
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(max_width.max(1.0));
        paragraph
    }

    /// Draw a single line with `y` as the baseline, anchored per `align`.
    pub fn draw_line(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, size: f32, color: skia::Color, bold: bool, align: Align) {
        let p = self.layout(text, size, color, bold, 10_000.0, TextAlign::Left);
        let w = p.longest_line();
        let left = match align {
            Align::Start => x,
            Align::Middle => x - w * 0.5,
            Align::End => x - w,
        };
        // Paragraph draws from top-left; adjust baseline by glyph height approximation
        p.paint(canvas, (left, y - size * 0.8));
    }

    /// Draw wrapped text inside `max_width` starting at the top-left corner; returns the height used.
    pub fn draw_wrapped(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, max_width: f32, size: f32, color: skia::Color) -> f32 {
        let p = self.layout(text, size, color, false, max_width, TextAlign::Left);
        p.paint(canvas, (x, y));
        p.height()
    }
}
