//! Per-search counters

use std::sync::atomic::{AtomicUsize, Ordering};

/// Snapshot of the counters of the last search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub tasks_scheduled: usize,
    pub tasks_executed: usize,
    pub max_depth: usize,
    /// Nodes created, root included.
    pub nodes: usize,
    /// Nodes that reported their result upward.
    pub notified: usize,
    /// Nodes that created children.
    pub expanded: usize,
    /// Combine steps run.
    pub combined: usize,
    /// Nodes skipped because an ancestor had already fast-exited.
    pub abandoned: usize,
}

/// Live counters, updated with relaxed atomics and read after the scheduler
/// has drained.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub tasks_scheduled: AtomicUsize,
    pub tasks_executed: AtomicUsize,
    pub max_depth: AtomicUsize,
    pub nodes: AtomicUsize,
    pub notified: AtomicUsize,
    pub expanded: AtomicUsize,
    pub combined: AtomicUsize,
    pub abandoned: AtomicUsize,
}

impl Counters {
    pub fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reached(&self, depth: usize) {
        self.max_depth.fetch_max(depth, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        for counter in self.all() {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> Diagnostics {
        let read = |c: &AtomicUsize| c.load(Ordering::Relaxed);
        Diagnostics {
            tasks_scheduled: read(&self.tasks_scheduled),
            tasks_executed: read(&self.tasks_executed),
            max_depth: read(&self.max_depth),
            nodes: read(&self.nodes),
            notified: read(&self.notified),
            expanded: read(&self.expanded),
            combined: read(&self.combined),
            abandoned: read(&self.abandoned),
        }
    }

    fn all(&self) -> [&AtomicUsize; 8] {
        [
            &self.tasks_scheduled,
            &self.tasks_executed,
            &self.max_depth,
            &self.nodes,
            &self.notified,
            &self.expanded,
            &self.combined,
            &self.abandoned,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_everything() {
        let counters = Counters::default();
        Counters::bump(&counters.nodes);
        Counters::bump(&counters.tasks_scheduled);
        counters.reached(7);
        counters.reset();
        assert_eq!(counters.snapshot(), Diagnostics::default());
    }

    #[test]
    fn test_max_depth_keeps_largest() {
        let counters = Counters::default();
        counters.reached(3);
        counters.reached(9);
        counters.reached(4);
        assert_eq!(counters.snapshot().max_depth, 9);
    }
}
