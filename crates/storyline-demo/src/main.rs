// File: crates/storyline-demo/src/main.rs
// Summary: Walks a narrative headlessly on a manual clock and writes each fully revealed scene to a PNG.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use storyline_core::{Clock, ManualClock, Narrative, NarrativeController, RenderStatus, Stage, Step, StoryConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // Args: [narrative name or .toml] [config.toml] [out_dir]
    let mut args = std::env::args().skip(1);
    let which = args.next().unwrap_or_else(|| "renewables".to_string());
    let config = match args.next() {
        Some(p) if !p.is_empty() && p != "-" => StoryConfig::load(&p).with_context(|| format!("failed to load config '{p}'"))?,
        _ => StoryConfig::default(),
    };
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "target/storyline".to_string()));

    let narrative = Narrative::resolve(&which).with_context(|| format!("failed to load narrative '{which}'"))?;
    let slug = slug(&which);
    let clock = ManualClock::new();
    let stage = Stage::new(config.theme());
    let settle = Duration::from_millis(config.chart.animation_ms) + config.reveal.fade();
    let reveal = config.reveal;

    let mut controller = NarrativeController::builder(narrative).config(config).clock(clock.clone()).build();
    let total = controller.state().total();
    tracing::info!(narrative = %which, scenes = total, out = %out_dir.display(), "exporting");

    let mut failed = 0usize;
    for i in 0..total {
        if i > 0 {
            if let Step::Moved { render: RenderStatus::Failed(kind), .. } = controller.jump_to(i)? {
                tracing::warn!(scene = i, ?kind, "scene exported with a notice");
            }
        }
        if controller.failure().is_some() {
            failed += 1;
        }
        let count = controller.current_scene().annotations.len();
        clock.advance(settle.max(reveal.offset(count.saturating_sub(1)) + reveal.fade()));
        let placed = controller.pump();

        let path = out_dir.join(format!("{slug}_{:02}.png", i + 1));
        stage.render_png(&controller, clock.now(), &path).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(scene = i, annotations = placed, path = %path.display(), "wrote frame");
    }

    if failed > 0 {
        tracing::warn!(failed, total, "some scenes could not be drawn");
    }
    Ok(())
}

/// File stem for built-in names and `.toml` paths alike.
fn slug(which: &str) -> String {
    Path::new(which)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "narrative".to_string())
}
