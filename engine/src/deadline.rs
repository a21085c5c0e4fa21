//! Wall-clock cutoff shared by a whole search

use std::time::{Duration, Instant};

/// Computed once per search as `now + timeout` and only ever read afterwards.
///
/// A timeout too large to represent as an `Instant` means no deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// Cutoff `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Deadline(Instant::now().checked_add(timeout))
    }

    /// Checked cooperatively before each expansion; never preempts.
    pub fn passed(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_has_passed() {
        assert!(Deadline::after(Duration::ZERO).passed());
    }

    #[test]
    fn test_unrepresentable_timeout_never_passes() {
        let deadline = Deadline::after(Duration::MAX);
        assert_eq!(deadline, Deadline(None));
        assert!(!deadline.passed());
    }

    #[test]
    fn test_future_deadline_not_passed() {
        let deadline = Deadline::after(Duration::from_secs(3600));
        assert!(!deadline.passed());
        assert!(deadline.0.is_some());
    }
}
