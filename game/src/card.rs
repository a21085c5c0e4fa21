//! Cards and colors

use crate::error::ParseError;
use std::fmt;
use std::str::FromStr;

/// Highest card value; values run 1..=MAX_VALUE.
pub const MAX_VALUE: u8 = 7;

/// Copies of each value per color.
pub const COPIES: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Red, Color::Black];

    /// The opposing side.
    pub fn other(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// Array index: red 0, black 1.
    pub fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Black => 1,
        }
    }

    fn letter(self) -> char {
        match self {
            Color::Red => 'r',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Black => write!(f, "Black"),
        }
    }
}

impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Color::Red),
            "b" | "black" => Ok(Color::Black),
            _ => Err(ParseError::Color(s.to_string())),
        }
    }
}

/// A colored card valued 1..=7, written `"3r"` or `"7b"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    color: Color,
    value: u8,
}

impl Card {
    /// # Panics
    /// If `value` is outside 1..=7.
    pub fn new(color: Color, value: u8) -> Self {
        assert!((1..=MAX_VALUE).contains(&value), "card value {value} out of range");
        Card { color, value }
    }

    /// Which side's deck the card belongs to.
    pub fn color(self) -> Color {
        self.color
    }

    /// Face value, 1..=7. Runs are summed over these.
    pub fn value(self) -> u8 {
        self.value
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.color.letter())
    }
}

impl FromStr for Card {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Card(s.to_string());
        let mut chars = s.chars();
        let (Some(digit), Some(letter), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let value = digit.to_digit(10).filter(|v| (1..=u32::from(MAX_VALUE)).contains(v)).ok_or_else(invalid)?;
        let color = match letter {
            'r' => Color::Red,
            'b' => Color::Black,
            _ => return Err(invalid()),
        };
        Ok(Card::new(color, value as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cards() {
        assert_eq!("3r".parse::<Card>().unwrap(), Card::new(Color::Red, 3));
        assert_eq!("7b".parse::<Card>().unwrap(), Card::new(Color::Black, 7));
        for bad in ["", "3", "0r", "8b", "3x", "3rr", "r3"] {
            assert_eq!(bad.parse::<Card>(), Err(ParseError::Card(bad.to_string())));
        }
    }

    #[test]
    fn test_display_matches_parse() {
        let card = Card::new(Color::Black, 5);
        assert_eq!(card.to_string(), "5b");
        assert_eq!(card.to_string().parse::<Card>().unwrap(), card);
    }

    #[test]
    fn test_colors() {
        assert_eq!(Color::Red.other(), Color::Black);
        assert_eq!("BLACK".parse::<Color>().unwrap(), Color::Black);
        assert_eq!("r".parse::<Color>().unwrap(), Color::Red);
        assert!("green".parse::<Color>().is_err());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_zero_value_panics() {
        Card::new(Color::Red, 0);
    }
}
