//! The position contract the engine searches over
//!
//! The engine never looks inside a position. Everything it needs (legal
//! moves, immediate wins, hidden-card reveals) comes through [`GameState`].
//! States are values: every branch gets its own copy and nothing is mutated
//! in place once shared.

use crate::outcome::Move;
use std::fmt::Debug;

/// Opponent threat detected before move enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForcedResponse {
    /// Nothing to answer; every legal move is considered.
    #[default]
    None,
    /// Exactly one reply stops the opponent; only this move is expanded.
    Single(Move),
    /// Two or more simultaneous threats; the side to move has lost.
    DoubleThreat,
}

/// A full game position, including hidden-card bookkeeping.
pub trait GameState: Clone + Send + Sync + 'static {
    /// Identifies the side to move.
    type Side: Copy + Debug + PartialEq;
    /// Identifies one possible hidden-card reveal.
    type Chance: Copy + Debug + Send + Sync;

    /// True if the side to move has no card to play (a tie).
    fn is_terminal(&self) -> bool;

    fn active_side(&self) -> Self::Side;

    /// Legal moves in iteration order. Ties between equally good moves are
    /// broken in favor of the earliest one.
    fn legal_moves(&self) -> Vec<Move>;

    /// Play `mv` on a copy of `self`; the flag reports an immediate win.
    fn apply(&self, mv: Move) -> (Self, bool);

    /// Possible reveals with their weights (number of equally likely ways
    /// each can occur). Zero-weight entries are ignored by the engine.
    fn chance_outcomes(&self) -> Vec<(Self::Chance, u32)>;

    /// Reveal `outcome` on a copy of `self`.
    fn apply_chance(&self, outcome: Self::Chance) -> Self;

    /// Threat check used by the forced-response enhancement.
    fn forced_response(&self) -> ForcedResponse {
        ForcedResponse::None
    }
}
