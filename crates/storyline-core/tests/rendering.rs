// File: crates/storyline-core/tests/rendering.rs
// Purpose: Mount lifecycle across chart kinds, render/dataset failure handling, anchors, tooltips, resize.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use storyline_core::dataset::DatasetView;
use storyline_core::mount::Shape;
use storyline_core::narratives;
use storyline_core::render::XScale;
use storyline_core::{
    Anchor, Annotation, ChartKind, ChartRenderer, Clock, DatasetRef, FailureKind, ManualClock, Mount, Narrative, NarrativeController,
    Owner, RenderError, RenderOptions, RenderStatus, Renderers, Scales, Scene, Step,
};

fn build(n: Narrative, renderers: Renderers) -> (NarrativeController, ManualClock) {
    let clock = ManualClock::new();
    let c = NarrativeController::builder(n).clock(clock.clone()).renderers(renderers).build();
    (c, clock)
}

struct Failing;

impl ChartRenderer for Failing {
    fn render(&self, mount: &mut Mount, _: &DatasetView, scene: &Scene, _: &RenderOptions) -> Result<Scales, RenderError> {
        // half-drawn output must never reach the visible mount
        mount.draw(Shape::Circle { center: Default::default(), radius: 3.0 }, storyline_core::mount::Style::fill(storyline_core::Theme::light().accent));
        Err(RenderError::Shape { kind: scene.chart, reason: "boom".into() })
    }
}

/// Bar renderer that fails while its switch is on.
struct Switchable {
    fail: Rc<Cell<bool>>,
}

impl ChartRenderer for Switchable {
    fn render(&self, mount: &mut Mount, view: &DatasetView, scene: &Scene, opts: &RenderOptions) -> Result<Scales, RenderError> {
        if self.fail.get() {
            return Err(RenderError::Shape { kind: scene.chart, reason: "switched off".into() });
        }
        storyline_core::render::BarRenderer.render(mount, view, scene, opts)
    }
}

fn switchable(fail: bool) -> (NarrativeController, ManualClock, Rc<Cell<bool>>) {
    let switch = Rc::new(Cell::new(fail));
    let mut r = Renderers::builtin();
    r.set(ChartKind::CategoricalBar, Switchable { fail: Rc::clone(&switch) });
    let (c, clock) = build(narratives::renewables().unwrap(), r);
    (c, clock, switch)
}

#[test]
fn pie_to_multi_line_leaves_no_pie_marks() {
    let n = Narrative::new(
        "mix",
        vec![
            Scene::new(0, "Pie", "", ChartKind::Pie, DatasetRef::new("co2_shares")),
            Scene::new(1, "Lines", "", ChartKind::MultiLine, DatasetRef::new("growth_trends")),
        ],
    )
    .unwrap();
    let (mut c, _) = build(n, Renderers::builtin());
    assert!(c.mount().count_owned(|o| *o == Owner::Chart(ChartKind::Pie)) > 0);

    c.advance();
    assert_eq!(c.mount().chart_kind(), Some(ChartKind::MultiLine));
    assert_eq!(c.mount().count_owned(|o| *o == Owner::Chart(ChartKind::Pie)), 0);
    assert!(!c.mount().elements().iter().any(|e| matches!(e.shape, Shape::Wedge { .. })));
    assert!(c.mount().elements().iter().any(|e| matches!(e.shape, Shape::Polyline(_))));
}

#[test]
fn render_failure_stays_on_target_and_recovers() {
    let mut r = Renderers::builtin();
    r.set(ChartKind::Scatter, Failing);
    let (mut c, clock) = build(narratives::renewables().unwrap(), r);

    let step = c.advance();
    assert_eq!(step, Step::Moved { from: 0, to: 1, render: RenderStatus::Failed(FailureKind::RenderFailure) });
    assert_eq!(c.state().current(), 1);
    assert_eq!(c.panel().title, "Scene 2: Solar vs Wind Energy");
    let failure = c.failure().expect("failure recorded");
    assert_eq!((failure.scene, failure.kind), (1, FailureKind::RenderFailure));
    assert!(c.mount().elements().iter().all(|e| e.owner == Owner::Notice));
    assert!(!c.mount().is_empty());

    clock.advance_ms(10_000);
    assert_eq!(c.pump(), 0);

    let step = c.advance();
    assert!(matches!(step, Step::Moved { to: 2, render: RenderStatus::Drawn { pending_reveals: 2 }, .. }));
    assert!(c.failure().is_none());
    assert!(c.mount().count_owned(|o| *o == Owner::Notice) == 0);
}

#[test]
fn missing_dataset_is_reported_as_unavailable() {
    let n = Narrative::new(
        "gap",
        vec![
            Scene::new(0, "ok", "", ChartKind::CategoricalBar, DatasetRef::new("renewables_2020")),
            Scene::new(1, "missing", "", ChartKind::CategoricalBar, DatasetRef::new("no_such_data")),
        ],
    )
    .unwrap();
    let (mut c, _) = build(n, Renderers::builtin());
    assert!(matches!(c.advance(), Step::Moved { render: RenderStatus::Failed(FailureKind::DatasetUnavailable), .. }));
    assert!(c.failure().unwrap().message.contains("no_such_data"));
    assert!(c.retreat() != Step::Unchanged);
    assert!(c.failure().is_none());
}

#[test]
fn unregistered_kind_fails_cleanly() {
    let (mut c, _) = build(narratives::renewables().unwrap(), Renderers::empty());
    assert_eq!(c.failure().map(|f| f.kind), Some(FailureKind::RenderFailure));
    assert!(matches!(c.advance(), Step::Moved { render: RenderStatus::Failed(FailureKind::RenderFailure), .. }));
}

#[test]
fn every_builtin_scene_renders_and_resolves_its_annotations() {
    for name in narratives::names() {
        let (mut c, clock) = build(narratives::builtin(name).unwrap(), Renderers::builtin());
        for i in 0..c.state().total() {
            if i > 0 {
                c.jump_to(i).unwrap();
            }
            assert!(c.failure().is_none(), "{name} scene {i}: {:?}", c.failure());
            clock.advance_ms(10_000);
            let expected = c.current_scene().annotations.len();
            assert_eq!(c.pump(), expected, "{name} scene {i}: not every annotation resolved");
        }
    }
}

#[test]
fn unresolvable_anchor_is_skipped() {
    let scene = Scene::new(0, "bars", "", ChartKind::CategoricalBar, DatasetRef::new("renewables_2020"))
        .annotate(Annotation::new(Anchor::Slice { key: "China".into() }, "not a pie"))
        .annotate(Annotation::new(Anchor::Relative { x: 0.5, y: 0.5 }, "middle"));
    let (mut c, clock) = build(Narrative::new("skip", vec![scene]).unwrap(), Renderers::builtin());
    clock.advance_ms(5000);
    assert_eq!(c.pump(), 1);
    assert_eq!(c.revealed(), &[1]);
}

#[test]
fn bars_expose_tooltips_once_drawn() {
    let (c, clock) = build(narratives::renewables().unwrap(), Renderers::builtin());
    let scales = c.scales().unwrap();
    let XScale::Band(band) = &scales.x else { panic!("bar chart uses a band axis") };
    assert_eq!(band.categories()[0], "China");
    let y = scales.y.unwrap();
    let x = band.center("China").unwrap();
    let py = y.to_px(905.0 / 2.0);

    assert_eq!(scales.tops.get("China"), Some(&905.0));
    clock.advance_ms(2000);
    assert_eq!(c.mount().hit_test(x, py, clock.now()), Some("China: 905 GW"));
    assert_eq!(c.mount().hit_test(2.0, 2.0, Duration::from_secs(2)), None);
}

#[test]
fn anchors_resolve_through_the_returned_scales() {
    let (mut c, _) = build(narratives::outlook().unwrap(), Renderers::builtin());
    c.jump_to(1).unwrap();
    let s = c.scales().unwrap().clone();
    let XScale::Linear(x) = &s.x else { panic!("numeric years use a linear axis") };
    let y = s.y.unwrap();

    let p = s.resolve(&Anchor::Value { x: 2021.0, y: 250.0 }).unwrap();
    assert!((p.x - x.to_px(2021.0)).abs() < 1e-3 && (p.y - y.to_px(250.0)).abs() < 1e-3);

    // value-less date anchors follow the primary (first) series
    let date = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let p = s.resolve(&Anchor::Date { date, value: None }).unwrap();
    assert!((p.y - y.to_px(200.0)).abs() < 1e-3);

    let r = s.resolve(&Anchor::Relative { x: 0.0, y: 1.0 }).unwrap();
    assert_eq!((r.x, r.y), (s.plot.left, s.plot.bottom));
    assert!(s.resolve(&Anchor::Slice { key: "solar".into() }).is_none());
}

#[test]
fn resize_rerenders_without_animation_and_keeps_callouts() {
    let (mut c, clock) = build(narratives::renewables().unwrap(), Renderers::builtin());
    clock.advance_ms(1100);
    assert_eq!(c.pump(), 1);

    let status = c.resize(720, 480);
    assert_eq!(status, Some(RenderStatus::Drawn { pending_reveals: 1 }));
    assert_eq!((c.mount().width(), c.mount().height()), (720, 480));
    assert_eq!(c.mount().callout_ordinals(), vec![0]);
    assert!(c.mount().is_settled(clock.now()));
    assert_eq!(c.resize(720, 480), None);

    clock.advance_ms(400);
    assert_eq!(c.pump(), 1);
    assert_eq!(c.mount().callout_ordinals(), vec![0, 1]);
}

#[test]
fn reveals_survive_a_failed_resize() {
    let (mut c, clock, switch) = switchable(false);
    assert_eq!(c.pending_reveals(), 2);

    switch.set(true);
    assert_eq!(c.resize(800, 500), Some(RenderStatus::Failed(FailureKind::RenderFailure)));
    clock.advance_ms(5000);
    assert_eq!(c.pump(), 0);
    assert_eq!(c.pending_reveals(), 2);
    assert_eq!(c.next_deadline(), None);

    switch.set(false);
    assert_eq!(c.resize(960, 600), Some(RenderStatus::Drawn { pending_reveals: 2 }));
    assert!(c.failure().is_none());
    assert_eq!(c.pump(), 2);
    assert_eq!(c.mount().callout_ordinals(), vec![0, 1]);
}

#[test]
fn first_render_failure_recovers_its_callouts_on_resize() {
    let (mut c, clock, switch) = switchable(true);
    assert_eq!(c.failure().map(|f| f.kind), Some(FailureKind::RenderFailure));
    assert_eq!(c.pending_reveals(), 0);

    switch.set(false);
    assert_eq!(c.resize(800, 500), Some(RenderStatus::Drawn { pending_reveals: 2 }));
    clock.advance_ms(999);
    assert_eq!(c.pump(), 0);
    clock.advance_ms(1);
    assert_eq!(c.pump(), 1);
    clock.advance_ms(500);
    assert_eq!(c.pump(), 1);
    assert_eq!(c.mount().callout_ordinals(), vec![0, 1]);
    assert_eq!(c.pending_reveals(), 0);
}

#[test]
fn duplicate_categories_are_rejected() {
    use storyline_core::{Catalog, Dataset, Key, Record};
    let dups = Dataset::new(
        "dups",
        vec!["v".to_string()],
        vec![Record::new(Key::category("A"), vec![1.0]), Record::new(Key::category("A"), vec![2.0])],
    )
    .unwrap();
    let mut catalog = Catalog::new();
    catalog.register_table(dups);
    let n = Narrative::new(
        "dups",
        vec![
            Scene::new(0, "bar", "", ChartKind::CategoricalBar, DatasetRef::new("dups")),
            Scene::new(1, "stacked", "", ChartKind::StackedBar, DatasetRef::new("dups")),
        ],
    )
    .unwrap();
    let mut c = NarrativeController::builder(n).provider(catalog).clock(ManualClock::new()).build();
    let f = c.failure().expect("bar rejects duplicates");
    assert_eq!(f.kind, FailureKind::RenderFailure);
    assert!(f.message.contains("duplicate category 'A'"), "{}", f.message);
    assert!(matches!(c.advance(), Step::Moved { render: RenderStatus::Failed(FailureKind::RenderFailure), .. }));
}
