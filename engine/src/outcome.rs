//! Search results: decisive/heuristic outcomes and the (outcome, move) pair
//!
//! Decisive results are carried as their own variants instead of being
//! encoded at the edges of the numeric range, so negation and clamping in the
//! chance-node combination never have to reason about sentinel arithmetic.

use std::cmp::Ordering;
use std::fmt;

/// Move identifier as reported by a [`GameState`](crate::state::GameState).
pub type Move = i32;

/// Move reported when no move was chosen (leaf evaluations, decisive losses).
pub const NO_MOVE: Move = 0;

/// Numeric stand-in for a decisive result when one has to be averaged.
pub const WIN_SCORE: f64 = i32::MAX as f64;

/// Value of a position from the perspective of the side it is reported to.
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    /// Proven loss.
    Loss,
    /// Approximate value from leaf evaluation or averaging.
    Heuristic(f64),
    /// Proven win.
    Win,
}

impl Outcome {
    /// Project onto the real line (`Win` → `WIN_SCORE`, `Loss` → `-WIN_SCORE`).
    pub fn score(self) -> f64 {
        match self {
            Outcome::Loss => -WIN_SCORE,
            Outcome::Heuristic(x) => x,
            Outcome::Win => WIN_SCORE,
        }
    }

    /// Proven win for the side this outcome is reported to.
    pub fn is_win(self) -> bool {
        matches!(self, Outcome::Win)
    }

    /// Proven loss for the side this outcome is reported to.
    pub fn is_loss(self) -> bool {
        matches!(self, Outcome::Loss)
    }

    /// Either proven result, as opposed to a heuristic estimate.
    pub fn is_decisive(self) -> bool {
        !matches!(self, Outcome::Heuristic(_))
    }

    fn rank(self) -> u8 {
        match self {
            Outcome::Loss => 0,
            Outcome::Heuristic(_) => 1,
            Outcome::Win => 2,
        }
    }
}

impl Ord for Outcome {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Outcome::Heuristic(a), Outcome::Heuristic(b)) => a.total_cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Outcome {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Outcome {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Outcome {}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Loss => write!(f, "loss"),
            Outcome::Heuristic(x) => write!(f, "{x:.4}"),
            Outcome::Win => write!(f, "win"),
        }
    }
}

/// A node's result: its outcome and the move that achieves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub outcome: Outcome,
    pub mv: Move,
}

impl Evaluation {
    pub fn new(outcome: Outcome, mv: Move) -> Self {
        Evaluation { outcome, mv }
    }

    /// Heuristic leaf value with no move attached.
    pub fn leaf(value: f64) -> Self {
        Evaluation::new(Outcome::Heuristic(value), NO_MOVE)
    }

    /// Real-valued view of the outcome.
    pub fn value(&self) -> f64 {
        self.outcome.score()
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "move {} (value {})", self.mv, self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decisive_bounds_every_heuristic() {
        for x in [-1e300, -1.0, 0.0, 1.0, WIN_SCORE, f64::INFINITY] {
            assert!(Outcome::Loss < Outcome::Heuristic(x));
            assert!(Outcome::Heuristic(x) < Outcome::Win);
        }
    }

    #[test]
    fn test_heuristics_compare_by_value() {
        assert!(Outcome::Heuristic(-0.5) < Outcome::Heuristic(0.25));
        assert_eq!(Outcome::Heuristic(2.0), Outcome::Heuristic(2.0));
        assert_eq!(Outcome::Win, Outcome::Win);
    }

    #[test]
    fn test_score_projection() {
        assert_eq!(Outcome::Win.score(), WIN_SCORE);
        assert_eq!(Outcome::Loss.score(), -WIN_SCORE);
        assert!((Outcome::Heuristic(0.75).score() - 0.75).abs() < 1e-10);
        assert!((Evaluation::leaf(-3.0).value() + 3.0).abs() < 1e-10);
        assert_eq!(Evaluation::leaf(1.0).mv, NO_MOVE);
    }
}
