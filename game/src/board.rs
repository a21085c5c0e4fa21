//! The growable row of card columns and its win rule
//!
//! Columns are indexed left to right from 0, cards within a column bottom to
//! top from 0. A move names where the mover's card goes: `-1` opens a new
//! column at the front, `columns()` opens one at the end, anything in between
//! stacks on that column.

use crate::card::Card;
use crate::error::ParseError;
use fifteen_engine::{ForcedResponse, Move};
use std::fmt;
use std::str::FromStr;

/// A same-colored run through the placed card summing to this wins.
pub const WIN_SUM: u32 = 15;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    columns: Vec<Vec<Card>>,
}

impl Board {
    /// Number of columns; moves run from -1 to this value.
    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    /// Every card on the board, column by column, bottom to top.
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.columns.iter().flatten().copied()
    }

    /// Put `card` at `column` (see the module docs for the numbering).
    ///
    /// # Panics
    /// If `column` is below -1 or past `columns()`.
    pub fn place(&mut self, column: Move, card: Card) {
        let len = self.columns.len();
        match column {
            -1 => self.columns.insert(0, vec![card]),
            c if c >= 0 && c as usize == len => self.columns.push(vec![card]),
            c if c >= 0 && (c as usize) < len => self.columns[c as usize].push(card),
            c => panic!("column {c} is off a board of {len} columns"),
        }
    }

    /// Copy of the board with `card` placed at `column`.
    pub fn placed(&self, column: Move, card: Card) -> Board {
        let mut next = self.clone();
        next.place(column, card);
        next
    }

    /// True if the top card of the column a card was just placed at (by
    /// `column` as given to [`place`](Self::place)) completes a winning run.
    pub fn is_win_involving(&self, column: Move) -> bool {
        let x = column.max(0) as isize;
        let Some(card) = self.columns.get(x as usize).and_then(|c| c.last()).copied() else {
            return false;
        };
        let y = self.columns[x as usize].len() as isize - 1;
        let run = |x0, y0, dx, dy| self.run(card, x0, y0, dx, dy);

        run(x, y, 0, -1) >= WIN_SUM
            || run(x, y, -1, 0) + run(x + 1, y, 1, 0) >= WIN_SUM
            || run(x, y, 1, 1) + run(x - 1, y - 1, -1, -1) >= WIN_SUM
            || run(x, y, 1, -1) + run(x - 1, y + 1, -1, 1) >= WIN_SUM
    }

    /// Where `card` would win if its owner placed it next.
    pub fn threats(&self, card: Card) -> ForcedResponse {
        let mut found = None;
        for column in -1..=self.columns.len() as Move {
            if self.placed(column, card).is_win_involving(column) {
                if found.is_some() {
                    return ForcedResponse::DoubleThreat;
                }
                found = Some(column);
            }
        }
        found.map_or(ForcedResponse::None, ForcedResponse::Single)
    }

    fn card_at(&self, x: isize, y: isize) -> Option<Card> {
        if x < 0 || y < 0 {
            return None;
        }
        self.columns.get(x as usize)?.get(y as usize).copied()
    }

    /// Sum of the same-colored run starting at `(x, y)` and stepping by `(dx, dy)`.
    fn run(&self, like: Card, mut x: isize, mut y: isize, dx: isize, dy: isize) -> u32 {
        let mut sum = 0;
        while let Some(card) = self.card_at(x, y).filter(|c| c.color() == like.color()) {
            sum += u32::from(card.value());
            x += dx;
            y += dy;
        }
        sum
    }

    /// Multi-line picture, top row first, `..` for empty cells.
    pub fn render(&self) -> String {
        let height = self.columns.iter().map(Vec::len).max().unwrap_or(0).max(3);
        let mut out = String::new();
        for y in (0..height as isize).rev() {
            out.push_str("..");
            for x in 0..self.columns.len() as isize {
                match self.card_at(x, y) {
                    Some(card) => out.push_str(&format!(" {card}")),
                    None => out.push_str(" .."),
                }
            }
            out.push_str(" ..\n");
        }
        out
    }
}

/// Compact notation: cards bottom to top, columns separated by `|`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            for (j, card) in column.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{card}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Board::default());
        }
        let columns = s
            .split('|')
            .enumerate()
            .map(|(i, text)| {
                let column = text.split_whitespace().map(str::parse).collect::<Result<Vec<Card>, _>>()?;
                if column.is_empty() {
                    return Err(ParseError::EmptyColumn(i));
                }
                Ok(column)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Board { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Color;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_place_numbering() {
        let mut b = Board::default();
        b.place(0, card("1r"));
        b.place(-1, card("2r"));
        b.place(2, card("3r"));
        b.place(1, card("4b"));
        assert_eq!(b.to_string(), "2r | 1r 4b | 3r");
    }

    #[test]
    #[should_panic(expected = "off a board")]
    fn test_place_past_end_panics() {
        board("1r").place(2, card("2r"));
    }

    #[test]
    fn test_vertical_win() {
        let b = board("1b 5r 4r").placed(0, card("6r"));
        assert!(b.is_win_involving(0));
        let b = board("5r 1b 4r").placed(0, card("6r"));
        assert!(!b.is_win_involving(0));
    }

    #[test]
    fn test_horizontal_win_through_middle() {
        let b = board("5r | 1b | 6r").placed(1, card("4r"));
        assert!(!b.is_win_involving(1));
        let b = board("5r | 6r").placed(-1, card("4r"));
        assert!(b.is_win_involving(-1));
        let b = board("5r | 6r").placed(2, card("4r"));
        assert!(b.is_win_involving(2));
    }

    #[test]
    fn test_diagonal_wins() {
        // slash: (0,0) 5r, (1,1) 6r, (2,2) 4r
        let b = board("5r | 1b 6r | 1b 2b").placed(2, card("4r"));
        assert!(b.is_win_involving(2));
        // backslash: (0,2) 5r, (1,1) 6r, (2,0) 4r
        let b = board("1b 2b 5r | 1b 6r").placed(2, card("4r"));
        assert!(b.is_win_involving(2));
    }

    #[test]
    fn test_other_color_breaks_run() {
        let b = board("5r 3b").placed(0, card("7r"));
        assert!(!b.is_win_involving(0));
    }

    #[test]
    fn test_threats() {
        assert_eq!(Board::default().threats(card("7r")), ForcedResponse::None);
        assert_eq!(board("5b 4b").threats(card("6b")), ForcedResponse::Single(0));
        assert_eq!(board("5b 4b | 7b 2b").threats(card("6b")), ForcedResponse::DoubleThreat);
        assert_eq!(board("5b 4b").threats(card("6r")), ForcedResponse::None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("3r ||4b".parse::<Board>(), Err(ParseError::EmptyColumn(1)));
        assert!(matches!("3r | 9b".parse::<Board>(), Err(ParseError::Card(_))));
        assert_eq!("  ".parse::<Board>().unwrap(), Board::default());
    }

    #[test]
    fn test_render() {
        let b = board("3r | 1b 2b");
        assert_eq!(b.render(), ".. .. .. ..\n.. .. 2b ..\n.. 3r 1b ..\n");
        assert_eq!(b.cards().filter(|c| c.color() == Color::Black).count(), 2);
    }
}
