//! Chance-node rules: weighted reveals and expectation
//!
//! A chance node sits between a move and the opponent's reply. Its children
//! are valued from the opponent's side, so the combined value is the negated
//! weighted average of theirs.

use crate::outcome::Outcome;
use crate::state::GameState;

/// Decision children of a chance node, one per reveal with positive weight.
pub(crate) fn reveal<S: GameState>(state: &S) -> Vec<(S, u32)> {
    state
        .chance_outcomes()
        .into_iter()
        .filter(|&(_, weight)| weight > 0)
        .map(|(outcome, weight)| (state.apply_chance(outcome), weight))
        .collect()
}

/// Combine child outcomes `(outcome, weight)` into the chance node's outcome.
///
/// - every child lost: the reveal cannot save the opponent, a win for us;
/// - some child won: all contributions are clamped to `win_ceiling` so one
///   proven win does not swamp the average;
/// - otherwise `-Σ wᵢ·vᵢ / Σ wᵢ`, with decisive children at `±WIN_SCORE`.
///
/// No children means the cards ran out: a tie, valued 0.
///
/// # Panics
/// If children are present but their weights sum to zero.
pub fn expectation(children: &[(Outcome, u32)], win_ceiling: f64) -> Outcome {
    if children.is_empty() {
        return Outcome::Heuristic(0.0);
    }
    if children.iter().all(|(outcome, _)| outcome.is_loss()) {
        return Outcome::Win;
    }

    let ceiling = if children.iter().any(|(outcome, _)| outcome.is_win()) {
        win_ceiling
    } else {
        f64::INFINITY
    };
    let mut sum = 0.0_f64;
    let mut total = 0_u64;
    for &(outcome, weight) in children {
        sum += f64::from(weight) * outcome.score().min(ceiling);
        total += u64::from(weight);
    }
    assert!(total > 0, "chance node has {} children but zero total weight", children.len());

    Outcome::Heuristic(-sum / total as f64)
}
