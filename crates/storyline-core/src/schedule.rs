// File: crates/storyline-core/src/schedule.rs
// Summary: Cancellable annotation reveal tasks tagged with the scene visit that scheduled them.

use std::time::Duration;

/// Identifies one visit of one scene. A new epoch starts on every transition, including a
/// return to a scene visited before.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisitTag {
    pub scene: usize,
    pub epoch: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealTask {
    pub tag: VisitTag,
    pub ordinal: usize,
    pub due: Duration,
}

#[derive(Debug, Default)]
pub struct RevealScheduler {
    tasks: Vec<RevealTask>,
    epoch: u64,
}

impl RevealScheduler {
    pub fn new() -> Self { Self::default() }

    /// Start a new visit of `scene`; cancels everything pending.
    pub fn begin_visit(&mut self, scene: usize) -> VisitTag {
        let dropped = self.cancel_all();
        if dropped > 0 {
            tracing::debug!(dropped, "pending reveals cancelled");
        }
        self.epoch += 1;
        VisitTag { scene, epoch: self.epoch }
    }

    pub fn schedule(&mut self, tag: VisitTag, ordinal: usize, due: Duration) {
        self.tasks.push(RevealTask { tag, ordinal, due });
    }

    pub fn cancel_all(&mut self) -> usize {
        let n = self.tasks.len();
        self.tasks.clear();
        n
    }

    /// Remove and return the tasks due at `now` that belong to `current`, in due order.
    /// Due tasks from any other visit are dropped.
    pub fn drain_due(&mut self, now: Duration, current: VisitTag) -> Vec<RevealTask> {
        let mut due = Vec::new();
        self.tasks.retain(|t| {
            if t.due > now {
                return true;
            }
            if t.tag == current {
                due.push(*t);
            } else {
                tracing::trace!(scene = t.tag.scene, epoch = t.tag.epoch, ordinal = t.ordinal, "stale reveal suppressed");
            }
            false
        });
        due.sort_by_key(|t| (t.due, t.ordinal));
        due
    }

    pub fn is_pending(&self, tag: VisitTag, ordinal: usize) -> bool {
        self.tasks.iter().any(|t| t.tag == tag && t.ordinal == ordinal)
    }

    pub fn next_deadline(&self) -> Option<Duration> { self.tasks.iter().map(|t| t.due).min() }

    pub fn pending(&self) -> usize { self.tasks.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_tasks_never_fire() {
        let mut s = RevealScheduler::new();
        let a = s.begin_visit(0);
        s.schedule(a, 0, Duration::from_millis(100));
        // re-entering without begin_visit simulates a task that escaped cancellation
        s.schedule(VisitTag { scene: 0, epoch: 0 }, 1, Duration::from_millis(50));
        let fired = s.drain_due(Duration::from_millis(200), a);
        assert_eq!(fired.iter().map(|t| t.ordinal).collect::<Vec<_>>(), vec![0]);
        assert_eq!(s.pending(), 0);
    }
}
