// File: crates/storyline-core/tests/reveal.rs
// Purpose: Annotation reveal timing, stale-reveal suppression across rapid navigation, and idempotent re-entry.

use std::time::Duration;

use storyline_core::mount::Shape;
use storyline_core::narratives;
use storyline_core::{AnnotationPlacer, CalloutPlacer, ManualClock, Mount, NarrativeController, Owner, Step, Theme};

fn controller(name: &str) -> (NarrativeController, ManualClock) {
    let clock = ManualClock::new();
    let c = NarrativeController::builder(narratives::builtin(name).unwrap()).clock(clock.clone()).build();
    (c, clock)
}

fn callout_texts(m: &Mount) -> Vec<String> {
    m.elements()
        .iter()
        .filter(|e| matches!(e.owner, Owner::Callout { .. }))
        .filter_map(|e| match &e.shape {
            Shape::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn callouts_follow_the_marks_in_order() {
    let (mut c, clock) = controller("renewables");
    assert_eq!(c.pending_reveals(), 2);
    assert_eq!(c.next_deadline(), Some(Duration::from_millis(1000)));
    assert_eq!(c.pump(), 0);

    clock.advance_ms(999);
    assert_eq!(c.pump(), 0);
    assert!(c.mount().callout_ordinals().is_empty());

    clock.advance_ms(1);
    assert_eq!(c.pump(), 1);
    assert_eq!(c.mount().callout_ordinals(), vec![0]);
    assert_eq!(c.next_deadline(), Some(Duration::from_millis(1500)));

    clock.advance_ms(500);
    assert_eq!(c.pump(), 1);
    assert_eq!(c.mount().callout_ordinals(), vec![0, 1]);
    assert_eq!(c.next_deadline(), None);
    assert_eq!(callout_texts(c.mount()), c.current_scene().annotations.iter().map(|a| a.text.clone()).collect::<Vec<_>>());
}

#[test]
fn rapid_double_advance_only_shows_the_final_scene() {
    let (mut c, clock) = controller("renewables");
    c.advance();
    clock.advance_ms(600);
    c.advance();
    clock.advance_ms(10_000);
    assert_eq!(c.pump(), 2);

    let expected: Vec<String> = c.narrative().scenes()[2].annotations.iter().map(|a| a.text.clone()).collect();
    assert_eq!(callout_texts(c.mount()), expected);
    assert_eq!(c.pending_reveals(), 0);
}

#[test]
fn leaving_before_a_reveal_cancels_it() {
    let (mut c, clock) = controller("outlook");
    clock.advance_ms(1200);
    assert_eq!(c.pump(), 1);
    c.advance();
    assert!(c.mount().callout_ordinals().is_empty(), "stale callout survived the transition");
    c.retreat();
    // a fresh visit starts its own schedule from zero
    clock.advance_ms(999);
    assert_eq!(c.pump(), 0);
    clock.advance_ms(1);
    assert_eq!(c.pump(), 1);
}

#[test]
fn same_index_jump_is_idempotent() {
    let (mut c, clock) = controller("climate");
    clock.advance_ms(5000);
    c.pump();
    let elements = c.mount().elements().to_vec();
    let ordinals = c.mount().callout_ordinals();
    assert_eq!(ordinals, vec![0, 1]);

    assert_eq!(c.jump_to(0).unwrap(), Step::Unchanged);
    assert_eq!(c.pump(), 0);
    assert_eq!(c.mount().elements(), elements.as_slice());
    assert_eq!(c.mount().callout_ordinals(), ordinals);
}

#[test]
fn placing_an_ordinal_twice_replaces_it() {
    let (c, _) = controller("renewables");
    let scales = c.scales().expect("scene 0 renders").clone();
    let ann = c.current_scene().annotations[0].clone();
    let placer = CalloutPlacer::new(Theme::light(), Duration::from_millis(500));
    let mut mount = c.mount().clone();

    assert!(placer.place(&mut mount, &scales, 0, &ann, Duration::ZERO));
    let once = mount.elements().len();
    assert!(placer.place(&mut mount, &scales, 0, &ann, Duration::from_millis(10)));
    assert_eq!(mount.elements().len(), once);
    assert_eq!(mount.callout_ordinals(), vec![0]);
}

#[test]
fn zero_delay_reveals_on_the_first_pump() {
    let clock = ManualClock::new();
    let mut cfg = storyline_core::StoryConfig::default();
    cfg.reveal.delay_ms = 0;
    cfg.reveal.stagger_ms = 0;
    let mut c = NarrativeController::builder(narratives::renewables().unwrap()).config(cfg).clock(clock).build();
    assert_eq!(c.pump(), 2);
}
