//! Decision-node rules: terminal checks, move enumeration and best-move choice
//!
//! These are pure functions of a position so the concurrent engine and the
//! synchronous reference evaluator expand and combine identically.

use crate::outcome::{Evaluation, Move};
use crate::state::{ForcedResponse, GameState};

/// What a decision node does on entry.
#[derive(Debug)]
pub(crate) enum Opening<S> {
    /// Evaluate with the leaf function (tie, or out of time).
    Leaf,
    /// The opponent has two threats; the side to move has lost.
    Lost,
    /// This move wins on the spot.
    Won(Move),
    /// One chance child per move, in iteration order. Never empty.
    Branches(Vec<(Move, S)>),
}

/// Run the entry checks of a decision node in order: tie, deadline, forced
/// response, then enumeration with the immediate-win short-circuit.
///
/// A forced move is still preceded by the win check on every legal move. A
/// forced move the state does not list as legal is ignored.
pub(crate) fn open<S: GameState>(state: &S, expired: bool, forced_responses: bool) -> Opening<S> {
    if state.is_terminal() || expired {
        return Opening::Leaf;
    }

    let forced = if forced_responses {
        state.forced_response()
    } else {
        ForcedResponse::None
    };
    let moves = state.legal_moves();
    let only = match forced {
        ForcedResponse::DoubleThreat => return Opening::Lost,
        ForcedResponse::Single(mv) if moves.contains(&mv) => Some(mv),
        ForcedResponse::Single(mv) => {
            log::debug!("forced move {mv} is not legal here, expanding every move");
            None
        }
        ForcedResponse::None => None,
    };

    let mut branches = Vec::with_capacity(moves.len());
    for mv in moves {
        let (next, won) = state.apply(mv);
        if won {
            return Opening::Won(mv);
        }
        if only.is_some_and(|forced| forced != mv) {
            continue;
        }
        branches.push((mv, next));
    }

    if branches.is_empty() {
        Opening::Leaf
    } else {
        Opening::Branches(branches)
    }
}

/// Best result by outcome; the earliest of equal results wins the tie.
pub(crate) fn best<I>(children: I) -> Option<Evaluation>
where
    I: IntoIterator<Item = Evaluation>,
{
    children.into_iter().fold(None, |best, child| match best {
        Some(b) if child.outcome <= b.outcome => Some(b),
        _ => Some(child),
    })
}
