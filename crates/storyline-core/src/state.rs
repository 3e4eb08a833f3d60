// File: crates/storyline-core/src/state.rs
// Summary: Narrative position and the pure progress/navigation projections derived from it.

use crate::scene::Narrative;

/// Current scene and scene count. `total >= 1` and `current < total` always hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NarrativeState {
    current: usize,
    total: usize,
}

impl NarrativeState {
    /// `None` for an empty narrative.
    pub fn new(total: usize) -> Option<Self> {
        (total > 0).then_some(Self { current: 0, total })
    }

    /// Start of a validated narrative, which always has at least one scene.
    pub(crate) fn for_narrative(n: &Narrative) -> Self {
        Self { current: 0, total: n.len().max(1) }
    }

    pub fn current(&self) -> usize { self.current }
    pub fn total(&self) -> usize { self.total }
    pub fn is_first(&self) -> bool { self.current == 0 }
    pub fn is_last(&self) -> bool { self.current + 1 == self.total }

    /// Move to `index`. Callers check bounds first.
    pub(crate) fn set(&mut self, index: usize) {
        debug_assert!(index < self.total, "scene {index} out of range for {} scenes", self.total);
        self.current = index.min(self.total - 1);
    }
}

/// `current / (total - 1)`; a single-scene narrative is complete.
pub fn progress_fraction(s: &NarrativeState) -> f64 {
    if s.total <= 1 {
        return 1.0;
    }
    s.current as f64 / (s.total - 1) as f64
}

pub fn progress_percent(s: &NarrativeState) -> f64 { progress_fraction(s) * 100.0 }

pub fn is_prev_enabled(s: &NarrativeState) -> bool { !s.is_first() }

pub fn is_next_enabled(s: &NarrativeState) -> bool { !s.is_last() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_moves_within_bounds() {
        let mut s = NarrativeState::new(3).unwrap();
        s.set(2);
        assert!(s.is_last());
        s.set(0);
        assert!(s.is_first());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn set_rejects_out_of_range_in_debug() {
        let mut s = NarrativeState::new(3).unwrap();
        s.set(3);
    }
}
