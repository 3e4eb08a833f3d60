// File: crates/storyline-core/src/theme.rs
// Summary: Light/Dark theming for frame painting (panel, chart chrome, series palette).

use skia_safe as skia;

#[derive(Clone, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub panel: skia::Color,
    pub title: skia::Color,
    pub text: skia::Color,
    pub muted: skia::Color,
    pub grid: skia::Color,
    pub axis_line: skia::Color,
    pub axis_label: skia::Color,
    pub accent: skia::Color,
    pub button: skia::Color,
    pub button_disabled: skia::Color,
    pub button_text: skia::Color,
    pub progress_track: skia::Color,
    pub callout_fill: skia::Color,
    pub callout_text: skia::Color,
    pub notice: skia::Color,
    /// Series colors, used in order when a scene has no explicit color mapping.
    pub palette: Vec<skia::Color>,
}

fn material_palette() -> Vec<skia::Color> {
    vec![
        skia::Color::from_rgb(0x4C, 0xAF, 0x50), // green
        skia::Color::from_rgb(0x21, 0x96, 0xF3), // blue
        skia::Color::from_rgb(0x9C, 0x27, 0xB0), // purple
        skia::Color::from_rgb(0xFF, 0x98, 0x00), // orange
        skia::Color::from_rgb(0xE7, 0x4C, 0x3C), // red
        skia::Color::from_rgb(0x1A, 0xBC, 0x9C), // teal
        skia::Color::from_rgb(0xF1, 0xC4, 0x0F), // yellow
        skia::Color::from_rgb(0x95, 0xA5, 0xA6), // grey
    ]
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_argb(255, 250, 250, 252),
            panel: skia::Color::from_argb(255, 240, 242, 246),
            title: skia::Color::from_argb(255, 0x2c, 0x3e, 0x50),
            text: skia::Color::from_argb(255, 52, 58, 64),
            muted: skia::Color::from_argb(255, 120, 126, 134),
            grid: skia::Color::from_argb(255, 230, 230, 235),
            axis_line: skia::Color::from_argb(255, 60, 60, 70),
            axis_label: skia::Color::from_argb(255, 20, 20, 30),
            accent: skia::Color::from_argb(255, 0x4C, 0xAF, 0x50),
            button: skia::Color::from_argb(255, 0x34, 0x98, 0xdb),
            button_disabled: skia::Color::from_argb(255, 200, 204, 210),
            button_text: skia::Color::from_argb(255, 255, 255, 255),
            progress_track: skia::Color::from_argb(255, 222, 226, 230),
            callout_fill: skia::Color::from_argb(235, 255, 255, 255),
            callout_text: skia::Color::from_argb(255, 0x2c, 0x3e, 0x50),
            notice: skia::Color::from_argb(255, 200, 60, 60),
            palette: material_palette(),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: skia::Color::from_argb(255, 18, 18, 20),
            panel: skia::Color::from_argb(255, 28, 28, 32),
            title: skia::Color::from_argb(255, 245, 245, 250),
            text: skia::Color::from_argb(255, 210, 210, 220),
            muted: skia::Color::from_argb(255, 150, 150, 160),
            grid: skia::Color::from_argb(255, 40, 40, 45),
            axis_line: skia::Color::from_argb(255, 180, 180, 190),
            axis_label: skia::Color::from_argb(255, 235, 235, 245),
            accent: skia::Color::from_argb(255, 64, 160, 255),
            button: skia::Color::from_argb(255, 64, 160, 255),
            button_disabled: skia::Color::from_argb(255, 60, 60, 68),
            button_text: skia::Color::from_argb(255, 18, 18, 20),
            progress_track: skia::Color::from_argb(255, 48, 48, 54),
            callout_fill: skia::Color::from_argb(230, 36, 36, 42),
            callout_text: skia::Color::from_argb(255, 235, 235, 245),
            notice: skia::Color::from_argb(255, 220, 80, 80),
            palette: material_palette(),
        }
    }

    pub fn solarized_light() -> Self {
        Self {
            name: "solarized-light",
            background: skia::Color::from_argb(255, 0xfd, 0xf6, 0xe3), // base3
            panel: skia::Color::from_argb(255, 0xee, 0xe8, 0xd5),      // base2
            title: skia::Color::from_argb(255, 0x00, 0x2b, 0x36),      // base03
            text: skia::Color::from_argb(255, 0x58, 0x6e, 0x75),       // base01
            muted: skia::Color::from_argb(255, 0x93, 0xa1, 0xa1),      // base1
            grid: skia::Color::from_argb(255, 0xee, 0xe8, 0xd5),
            axis_line: skia::Color::from_argb(255, 0x65, 0x7b, 0x83),  // base00
            axis_label: skia::Color::from_argb(255, 0x00, 0x2b, 0x36),
            accent: skia::Color::from_argb(255, 0x26, 0x8b, 0xd2),     // blue
            button: skia::Color::from_argb(255, 0x26, 0x8b, 0xd2),
            button_disabled: skia::Color::from_argb(255, 0xd8, 0xd2, 0xc0),
            button_text: skia::Color::from_argb(255, 0xfd, 0xf6, 0xe3),
            progress_track: skia::Color::from_argb(255, 0xee, 0xe8, 0xd5),
            callout_fill: skia::Color::from_argb(235, 0xfd, 0xf6, 0xe3),
            callout_text: skia::Color::from_argb(255, 0x07, 0x36, 0x42),
            notice: skia::Color::from_argb(255, 0xdc, 0x32, 0x2f),     // red
            palette: vec![
                skia::Color::from_rgb(0x26, 0x8b, 0xd2),
                skia::Color::from_rgb(0x2a, 0xa1, 0x98),
                skia::Color::from_rgb(0xb5, 0x89, 0x00),
                skia::Color::from_rgb(0xcb, 0x4b, 0x16),
                skia::Color::from_rgb(0xd3, 0x36, 0x82),
                skia::Color::from_rgb(0x6c, 0x71, 0xc4),
                skia::Color::from_rgb(0x85, 0x99, 0x00),
                skia::Color::from_rgb(0xdc, 0x32, 0x2f),
            ],
        }
    }

    /// Palette color for series `i`, cycling.
    pub fn series_color(&self, i: usize) -> skia::Color {
        if self.palette.is_empty() { return self.accent; }
        self.palette[i % self.palette.len()]
    }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark(), Theme::solarized_light()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    for t in presets() { if t.name.eq_ignore_ascii_case(name) { return t; } }
    Theme::light()
}

/// Parse `#rrggbb` or `#aarrggbb` into a color.
pub fn parse_hex(s: &str) -> Option<skia::Color> {
    let h = s.trim().strip_prefix('#')?;
    let v = u32::from_str_radix(h, 16).ok()?;
    match h.len() {
        6 => Some(skia::Color::new(0xFF00_0000 | v)),
        8 => Some(skia::Color::new(v)),
        _ => None,
    }
}
