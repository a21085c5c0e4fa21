//! Errors for card text and position construction

use crate::card::{Card, Color, COPIES};
use thiserror::Error;

/// Text that does not describe a card, color or board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid card `{0}`, expected a value 1-7 followed by `r` or `b`")]
    Card(String),
    #[error("invalid color `{0}`, expected `red` or `black`")]
    Color(String),
    #[error("column {0} of the board is empty")]
    EmptyColumn(usize),
}

/// A board and top cards that cannot come from a real deal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("{card} appears {count} times, only {} copies exist", COPIES)]
    TooManyCopies { card: Card, count: u8 },
    #[error("{side} cannot hold {card}")]
    WrongColor { side: Color, card: Card },
}
