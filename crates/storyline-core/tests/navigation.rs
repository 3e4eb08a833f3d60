// File: crates/storyline-core/tests/navigation.rs
// Purpose: Controller state machine: bounds, guarded no-ops, progress, navigation flags, input mapping.

use storyline_core::frame::FrameLayout;
use storyline_core::narratives;
use storyline_core::{
    is_next_enabled, is_prev_enabled, progress_percent, Command, Control, InputEvent, KeyInput, ManualClock, NarrativeController,
    NarrativeState, Step, TransitionError,
};

fn controller(name: &str) -> (NarrativeController, ManualClock) {
    let clock = ManualClock::new();
    let c = NarrativeController::builder(narratives::builtin(name).expect("builtin")).clock(clock.clone()).build();
    (c, clock)
}

#[test]
fn jump_then_read_round_trips() {
    let (mut c, _) = controller("outlook");
    for i in [2usize, 0, 3, 1, 3] {
        c.jump_to(i).expect("in range");
        assert_eq!(c.state().current(), i);
        assert_eq!(c.current_scene().index, i);
    }
}

#[test]
fn boundaries_are_guarded_no_ops() {
    let (mut c, _) = controller("renewables");
    let before = c.mount().elements().len();
    assert_eq!(c.retreat(), Step::Unchanged);
    assert_eq!(c.state().current(), 0);
    assert_eq!(c.mount().elements().len(), before);

    c.jump_to(2).unwrap();
    assert_eq!(c.advance(), Step::Unchanged);
    assert_eq!(c.state().current(), 2);
}

#[test]
fn out_of_range_jump_leaves_state_alone() {
    let (mut c, _) = controller("renewables");
    c.advance();
    let err = c.jump_to(3).unwrap_err();
    assert_eq!(err, TransitionError::OutOfRange { requested: 3, total: 3 });
    assert_eq!(c.state().current(), 1);
    assert!(c.jump_to(usize::MAX).is_err());
    assert_eq!(c.state().current(), 1);
}

#[test]
fn progress_is_monotone_and_ends_at_100() {
    let (mut c, _) = controller("outlook");
    let mut last = c.panel().progress_percent;
    assert_eq!(last, 0.0);
    while let Step::Moved { .. } = c.advance() {
        let p = c.panel().progress_percent;
        assert!(p > last, "{p} should exceed {last}");
        last = p;
    }
    assert!((last - 100.0).abs() < 1e-9);
}

#[test]
fn three_scene_walkthrough() {
    let (mut c, _) = controller("renewables");
    let titles: Vec<String> = c.narrative().scenes().iter().map(|s| s.title.clone()).collect();

    let p = c.panel();
    assert_eq!((p.index, p.progress_percent, p.prev_enabled, p.next_enabled), (0, 0.0, false, true));
    assert_eq!(p.title, titles[0]);

    match c.advance() {
        Step::Moved { from, to, .. } => assert_eq!((from, to), (0, 1)),
        other => panic!("expected a move, got {other:?}"),
    }
    let p = c.panel();
    assert_eq!((p.index, p.progress_percent, p.prev_enabled, p.next_enabled), (1, 50.0, true, true));
    assert_eq!(p.title, titles[1]);

    c.advance();
    let p = c.panel();
    assert_eq!((p.index, p.progress_percent, p.prev_enabled, p.next_enabled), (2, 100.0, true, false));
    assert_eq!(p.title, titles[2]);
    assert_eq!(p.description, c.narrative().scenes()[2].description);
}

#[test]
fn projections_are_pure_functions_of_state() {
    let single = NarrativeState::new(1).unwrap();
    assert_eq!(progress_percent(&single), 100.0);
    assert!(!is_prev_enabled(&single) && !is_next_enabled(&single));
    assert!(NarrativeState::new(0).is_none());
}

#[test]
fn input_events_map_to_commands() {
    assert_eq!(InputEvent::Key(KeyInput::ArrowRight).command(), Some(Command::Advance));
    assert_eq!(InputEvent::Key(KeyInput::Space).command(), Some(Command::Advance));
    assert_eq!(InputEvent::Key(KeyInput::ArrowLeft).command(), Some(Command::Retreat));
    assert_eq!(InputEvent::Key(KeyInput::Other).command(), None);
    assert_eq!(InputEvent::Click(Control::Next).command(), Some(Command::Advance));
    assert_eq!(InputEvent::Click(Control::Previous).command(), Some(Command::Retreat));
    assert_eq!(InputEvent::Click(Control::Indicator(2)).command(), Some(Command::JumpTo(2)));

    let (mut c, _) = controller("renewables");
    c.apply(Command::JumpTo(2)).unwrap();
    c.apply(Command::Retreat).unwrap();
    assert_eq!(c.state().current(), 1);
    assert!(c.apply(Command::JumpTo(7)).is_err());
}

#[test]
fn footer_hit_testing_finds_controls() {
    let layout = FrameLayout::new(960, 780, 3);
    let center = |r: storyline_core::geometry::RectI32| ((r.left + r.right) as f64 / 2.0, (r.top + r.bottom) as f64 / 2.0);

    let (x, y) = center(layout.prev);
    assert_eq!(layout.hit_control(x, y), Some(Control::Previous));
    let (x, y) = center(layout.next);
    assert_eq!(layout.hit_control(x, y), Some(Control::Next));
    let (x, y) = center(layout.indicators[2]);
    assert_eq!(layout.hit_control(x, y), Some(Control::Indicator(2)));
    assert_eq!(layout.hit_control(480.0, 300.0), None);

    assert_eq!(layout.chart_size(), (960, 600));
    assert_eq!(layout.to_mount(10.0, 120.0), Some((10.0, 10.0)));
    assert_eq!(layout.to_mount(10.0, 5.0), None);
}
