//! Search configuration

use crate::error::SearchError;

/// Tunables for an [`Engine`](crate::search::Engine).
///
/// `win_ceiling` is a pruning heuristic rather than a property of the game:
/// when any reveal below a chance node is a proven win for the opponent, every
/// child contribution to the average is clamped to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Fixed number of worker threads.
    pub workers: usize,
    /// Clamp applied to child values when a sibling reports a win.
    pub win_ceiling: f64,
    /// Honor [`ForcedResponse`](crate::state::ForcedResponse) from the state.
    pub forced_responses: bool,
    /// Combine a decision node early once a child proves a win.
    pub fast_exit: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            workers: 2,
            win_ceiling: 20.0,
            forced_responses: true,
            fast_exit: true,
        }
    }
}

impl SearchConfig {
    /// Pool size. Zero is rejected by [`SearchConfig::validate`].
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_win_ceiling(mut self, win_ceiling: f64) -> Self {
        self.win_ceiling = win_ceiling;
        self
    }

    pub fn with_forced_responses(mut self, enabled: bool) -> Self {
        self.forced_responses = enabled;
        self
    }

    pub fn with_fast_exit(mut self, enabled: bool) -> Self {
        self.fast_exit = enabled;
        self
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.workers == 0 {
            return Err(SearchError::NoWorkers);
        }
        if !self.win_ceiling.is_finite() || self.win_ceiling <= 0.0 {
            return Err(SearchError::InvalidCeiling(self.win_ceiling));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = SearchConfig::default().with_workers(0);
        assert!(matches!(config.validate(), Err(SearchError::NoWorkers)));
    }

    #[test]
    fn test_bad_ceiling_rejected() {
        for ceiling in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            let config = SearchConfig::default().with_win_ceiling(ceiling);
            assert!(matches!(config.validate(), Err(SearchError::InvalidCeiling(_))));
        }
    }
}
