//! Fan-in countdown shared by a node and its children
//!
//! A gate is armed with the number of children before any child is scheduled.
//! Each child calls [`Gate::arrive`] exactly once; the call that takes the
//! count from one to zero returns `true`, and that thread alone combines.
//! [`Gate::force`] swaps the count straight to zero for the decisive fast
//! path; it returns `true` only if the gate had not already been released, so
//! arrivals racing a forced release never produce a second combiner.
//!
//! Child results are written before arriving. Both operations are AcqRel
//! read-modify-writes on the same atomic, so whichever thread releases the
//! gate observes every result written by children that arrived before it.

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct Gate {
    remaining: AtomicUsize,
}

impl Gate {
    /// Unarmed gate. It reads as released until [`Gate::arm`] is called.
    pub fn new() -> Self {
        Gate::default()
    }

    /// Set the number of outstanding children. Must precede any arrival.
    pub fn arm(&self, children: usize) {
        assert!(children > 0, "gate armed with no children");
        let previous = self.remaining.swap(children, Ordering::AcqRel);
        assert_eq!(previous, 0, "gate armed twice");
    }

    /// Record one child as finished. True for the unique last arrival.
    pub fn arrive(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok_and(|previous| previous == 1)
    }

    /// Release the gate regardless of stragglers. True if this call released it.
    pub fn force(&self) -> bool {
        self.remaining.swap(0, Ordering::AcqRel) > 0
    }

    /// True once the count has reached zero after being armed.
    pub fn is_released(&self) -> bool {
        self.remaining.load(Ordering::Acquire) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn test_last_arrival_releases() {
        let gate = Gate::new();
        gate.arm(3);
        assert!(!gate.arrive());
        assert!(!gate.arrive());
        assert!(gate.arrive());
        assert!(gate.is_released());
    }

    #[test]
    fn test_arrivals_after_release_are_ignored() {
        let gate = Gate::new();
        gate.arm(1);
        assert!(gate.arrive());
        assert!(!gate.arrive());
        assert!(gate.is_released());
    }

    #[test]
    fn test_force_releases_once() {
        let gate = Gate::new();
        gate.arm(4);
        assert!(!gate.arrive());
        assert!(gate.force());
        assert!(!gate.force());
        assert!(!gate.arrive());
        assert!(!gate.arrive());
    }

    #[test]
    fn test_force_after_natural_release_is_noop() {
        let gate = Gate::new();
        gate.arm(1);
        assert!(gate.arrive());
        assert!(!gate.force());
    }

    #[test]
    #[should_panic(expected = "gate armed with no children")]
    fn test_arm_zero_panics() {
        Gate::new().arm(0);
    }

    #[test]
    fn test_concurrent_arrivals_single_combiner() {
        for _ in 0..200 {
            let gate = Gate::new();
            let winners = AtomicUsize::new(0);
            gate.arm(64);
            thread::scope(|s| {
                for _ in 0..8 {
                    s.spawn(|| {
                        for _ in 0..8 {
                            if gate.arrive() {
                                winners.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    });
                }
            });
            assert_eq!(winners.load(Ordering::Relaxed), 1);
            assert!(gate.is_released());
        }
    }

    #[test]
    fn test_force_racing_arrivals_single_combiner() {
        for round in 0..200 {
            let gate = Gate::new();
            let winners = AtomicUsize::new(0);
            gate.arm(16);
            thread::scope(|s| {
                for t in 0..4 {
                    let gate = &gate;
                    let winners = &winners;
                    s.spawn(move || {
                        for i in 0..4 {
                            let released = if (t + i + round) % 7 == 0 {
                                gate.force()
                            } else {
                                gate.arrive()
                            };
                            if released {
                                winners.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    });
                }
            });
            assert_eq!(winners.load(Ordering::Relaxed), 1);
        }
    }
}
