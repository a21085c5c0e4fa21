//! fifteen Game - the two-color card game the engine searches
//!
//! Red and black each hold two copies of the cards 1 to 7. Players take turns
//! placing their visible top card on a growing row of columns and then draw
//! their next card blind. A same-colored line through the placed card summing
//! to 15 or more wins.

pub mod board;
pub mod card;
pub mod error;
pub mod eval;
pub mod state;

pub use board::Board;
pub use card::{Card, Color};
pub use error::{ParseError, PositionError};
pub use state::State;
