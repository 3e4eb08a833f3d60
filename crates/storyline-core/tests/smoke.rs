// File: crates/storyline-core/tests/smoke.rs
// Purpose: End-to-end frame export: PNG bytes/files for every built-in scene and RGBA8 buffer checks.

use storyline_core::narratives;
use storyline_core::{Clock, ManualClock, NarrativeController, Stage, Theme};

fn controller(name: &str) -> (NarrativeController, ManualClock) {
    let clock = ManualClock::new();
    let c = NarrativeController::builder(narratives::builtin(name).unwrap()).clock(clock.clone()).build();
    (c, clock)
}

#[test]
fn render_smoke_png() {
    let (mut c, clock) = controller("climate");
    let stage = Stage::new(Theme::light());
    let out = std::path::PathBuf::from("target/test_out");
    std::fs::create_dir_all(&out).unwrap();

    for i in 0..c.state().total() {
        c.jump_to(i).unwrap();
        clock.advance_ms(5000);
        c.pump();
        let path = out.join(format!("climate_{i}.png"));
        stage.render_png(&c, clock.now(), &path).expect("render should succeed");
        let meta = std::fs::metadata(&path).expect("output exists");
        assert!(meta.len() > 0, "png should be non-empty");
    }

    let bytes = stage.render_png_bytes(&c, clock.now()).expect("render bytes");
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");
    let img = image::load_from_memory(&bytes).expect("decodable png");
    assert_eq!((img.width(), img.height()), (960, 780));
}

#[test]
fn render_rgba8_frame() {
    let (c, clock) = controller("renewables");
    let theme = Theme::light();
    let stage = Stage::new(theme.clone());
    let (px, w, h) = stage.render_rgba8(&c, clock.now()).expect("rgba render");
    assert_eq!((w, h), (960, 780));
    assert_eq!(w as usize * h as usize * 4, px.len());
    assert_eq!(px[3], 255);

    let at = |x: usize, y: usize| {
        let i = (y * w as usize + x) * 4;
        [px[i], px[i + 1], px[i + 2]]
    };
    // header panel, then the footer buttons: previous disabled on the first scene
    assert_eq!(at(2, 2), [theme.panel.r(), theme.panel.g(), theme.panel.b()]);
    let d = theme.button_disabled;
    assert_eq!(at(32, 745), [d.r(), d.g(), d.b()]);
    let b = theme.button;
    assert_eq!(at(824, 745), [b.r(), b.g(), b.b()]);
}

#[test]
fn failed_scene_still_exports_a_frame() {
    let mut r = storyline_core::Renderers::builtin();
    r.set(storyline_core::ChartKind::CategoricalBar, storyline_core::render::BarRenderer);
    let clock = ManualClock::new();
    let n = storyline_core::Narrative::new(
        "gap",
        vec![storyline_core::Scene::new(
            0,
            "missing",
            "",
            storyline_core::ChartKind::CategoricalBar,
            storyline_core::DatasetRef::new("no_such_data"),
        )],
    )
    .unwrap();
    let c = NarrativeController::builder(n).clock(clock.clone()).renderers(r).build();
    assert!(c.failure().is_some());
    let bytes = Stage::new(Theme::dark()).render_png_bytes(&c, clock.now()).expect("notice frame renders");
    assert!(bytes.starts_with(&[137, 80, 78, 71]));
}
