//! Synchronous recursive expectimax over the same rules as the engine
//!
//! This is the straightforward recursion the concurrent engine must agree
//! with when it is given unlimited time: decision nodes take the best child
//! (first winning move returns at once), chance nodes take the weighted,
//! negated, clamped expectation. The budget counts decision plies instead of
//! wall-clock time, so results are reproducible.
//!
//! Chance-node children are independent subtrees that only need a shared
//! reference to the leaf function, so they are evaluated in parallel with
//! Rayon. Decision nodes stay sequential to keep the early return on a win.

use crate::chance;
use crate::config::SearchConfig;
use crate::decision::{self, Opening};
use crate::outcome::{Evaluation, Outcome, NO_MOVE};
use crate::state::GameState;
use rayon::prelude::*;

/// How deep the reference evaluator may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Explore until every branch ends.
    Unbounded,
    /// Leaf-evaluate decision nodes this many plies below the root.
    Depth(usize),
}

impl Budget {
    fn exhausted(self) -> bool {
        self == Budget::Depth(0)
    }

    fn descend(self) -> Budget {
        match self {
            Budget::Unbounded => Budget::Unbounded,
            Budget::Depth(d) => Budget::Depth(d.saturating_sub(1)),
        }
    }
}

/// Value and best move of `state` for the side to move.
///
/// Uses `config.forced_responses` and `config.win_ceiling`; the worker count
/// and fast-exit flag do not apply here.
pub fn evaluate<S, F>(leaf: &F, state: &S, budget: Budget, config: &SearchConfig) -> Evaluation
where
    S: GameState,
    F: Fn(&S) -> f64 + Sync,
{
    match decision::open(state, budget.exhausted(), config.forced_responses) {
        Opening::Leaf => Evaluation::leaf(leaf(state)),
        Opening::Lost => Evaluation::new(Outcome::Loss, NO_MOVE),
        Opening::Won(mv) => Evaluation::new(Outcome::Win, mv),
        Opening::Branches(branches) => {
            let mut best: Option<Evaluation> = None;
            for (mv, next) in branches {
                let child = Evaluation::new(expect(leaf, &next, budget.descend(), config), mv);
                if child.outcome.is_win() {
                    return child;
                }
                best = decision::best(best.into_iter().chain(Some(child)));
            }
            best.unwrap_or_else(|| Evaluation::leaf(leaf(state)))
        }
    }
}

/// Outcome of the chance node reached after a move, for the mover.
fn expect<S, F>(leaf: &F, state: &S, budget: Budget, config: &SearchConfig) -> Outcome
where
    S: GameState,
    F: Fn(&S) -> f64 + Sync,
{
    let reveals = chance::reveal(state);
    let children: Vec<(Outcome, u32)> = reveals
        .par_iter()
        .map(|(next, weight)| (evaluate(leaf, next, budget, config).outcome, *weight))
        .collect();
    chance::expectation(&children, config.win_ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_tree::{
        decisive_reveal_tree, double_threat_tree, forced_tree, leaf_value, two_ply_tree, winning_tree, Scripted,
        TWO_PLY_VALUE,
    };

    fn run(game: crate::test_tree::ScriptedGame, budget: Budget) -> Evaluation {
        evaluate(&leaf_value, &Scripted::root(game), budget, &SearchConfig::default())
    }

    #[test]
    fn test_two_ply_value() {
        let result = run(two_ply_tree(), Budget::Unbounded);
        assert_eq!(result.mv, 2);
        assert!((result.value() - TWO_PLY_VALUE).abs() < 1e-10);
    }

    #[test]
    fn test_depth_zero_is_leaf() {
        let result = run(two_ply_tree(), Budget::Depth(0));
        assert_eq!(result, Evaluation::leaf(0.3));
    }

    #[test]
    fn test_decisive_cases() {
        assert_eq!(run(winning_tree(), Budget::Unbounded), Evaluation::new(Outcome::Win, 2));
        assert_eq!(run(double_threat_tree(), Budget::Unbounded), Evaluation::new(Outcome::Loss, NO_MOVE));
        assert_eq!(run(decisive_reveal_tree(), Budget::Unbounded), Evaluation::new(Outcome::Win, 1));
    }

    #[test]
    fn test_forced_response_toggle() {
        let forced = run(forced_tree(), Budget::Unbounded);
        assert_eq!(forced.mv, 2);
        assert!((forced.value() + 0.5).abs() < 1e-10);

        let config = SearchConfig::default().with_forced_responses(false);
        let free = evaluate(&leaf_value, &Scripted::root(forced_tree()), Budget::Unbounded, &config);
        assert_eq!(free.mv, 1);
        assert!((free.value() - 0.9).abs() < 1e-10);
    }
}
