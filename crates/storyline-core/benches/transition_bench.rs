use anyhow::Result;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use storyline_core::narratives;
use storyline_core::{Clock, ManualClock, NarrativeController, Stage, Theme};

fn build(name: &str) -> (NarrativeController, ManualClock) {
    let clock = ManualClock::new();
    let c = NarrativeController::builder(narratives::builtin(name).expect("builtin narrative")).clock(clock.clone()).build();
    (c, clock)
}

fn bench_transitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("transition");
    for name in narratives::names() {
        group.bench_function(format!("cycle_{name}"), |b| {
            let (mut ctl, clock) = build(name);
            b.iter(|| {
                while let storyline_core::Step::Moved { .. } = ctl.advance() {
                    clock.advance_ms(2000);
                    black_box(ctl.pump());
                }
                black_box(ctl.jump_to(0)).ok();
            });
        });
    }
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_png_bytes");
    let stage = Stage::new(Theme::light());
    for name in narratives::names() {
        group.bench_function(format!("frame_{name}"), |b| {
            let (mut ctl, clock) = build(name);
            clock.advance_ms(5000);
            ctl.pump();
            b.iter(|| -> Result<()> {
                let bytes = stage.render_png_bytes(&ctl, clock.now())?;
                black_box(bytes);
                Ok(())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_transitions, bench_frame);
criterion_main!(benches);
