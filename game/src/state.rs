//! Full game position: board, visible top cards and unseen-card counts
//!
//! Each side shows one top card and draws its next one at random from the
//! cards of its color not yet seen. A side with nothing left to show cannot
//! move and the game is a tie.

use crate::board::Board;
use crate::card::{Card, Color, COPIES, MAX_VALUE};
use crate::error::PositionError;
use fifteen_engine::{ForcedResponse, GameState, Move};
use rand::Rng;
use std::fmt;

type Counts = [u8; MAX_VALUE as usize];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    board: Board,
    top: [Option<Card>; 2],
    unseen: [Counts; 2],
    who: Color,
}

impl State {
    /// Position from a board and both top cards. Unseen counts are whatever
    /// the board and the top cards leave of each color's deck.
    pub fn new(who: Color, red: Option<Card>, black: Option<Card>, board: Board) -> Result<Self, PositionError> {
        let top = [red, black];
        for side in Color::ALL {
            if let Some(card) = top[side.index()].filter(|c| c.color() != side) {
                return Err(PositionError::WrongColor { side, card });
            }
        }

        let mut unseen = [[COPIES; MAX_VALUE as usize]; 2];
        for card in board.cards().chain(top.iter().flatten().copied()) {
            let cell = &mut unseen[card.color().index()][usize::from(card.value() - 1)];
            if *cell == 0 {
                let count = board.cards().chain(top.iter().flatten().copied()).filter(|c| *c == card).count();
                return Err(PositionError::TooManyCopies {
                    card,
                    count: count as u8,
                });
            }
            *cell -= 1;
        }

        Ok(State { board, top, unseen, who })
    }

    /// Fresh game: empty board, both top cards drawn at random, red to move.
    pub fn deal<R: Rng>(rng: &mut R) -> Self {
        let mut state = State {
            board: Board::default(),
            top: [None, None],
            unseen: [[COPIES; MAX_VALUE as usize]; 2],
            who: Color::Red,
        };
        state.draw(rng, Color::Red);
        state.draw(rng, Color::Black);
        state
    }

    /// Replace `side`'s top card with a random unseen one, or nothing if its
    /// deck is exhausted.
    pub fn draw<R: Rng>(&mut self, rng: &mut R, side: Color) {
        let total = self.unseen_total(side);
        if total == 0 {
            self.top[side.index()] = None;
            return;
        }
        let mut k = rng.random_range(0..total);
        for value in 1..=MAX_VALUE {
            let count = u32::from(self.unseen(side, value));
            if k < count {
                return self.reveal(side, value);
            }
            k -= count;
        }
        unreachable!("draw index past the unseen total");
    }

    fn reveal(&mut self, side: Color, value: u8) {
        let cell = &mut self.unseen[side.index()][usize::from(value - 1)];
        assert!(*cell > 0, "{side} has no unseen {value} left");
        *cell -= 1;
        self.top[side.index()] = Some(Card::new(side, value));
    }

    /// Play the mover's top card at `column` and draw their next one.
    /// Returns the new position and whether the move won.
    ///
    /// # Panics
    /// If the side to move has no card.
    pub fn play<R: Rng>(&self, rng: &mut R, column: Move) -> (State, bool) {
        let (mut next, won) = self.apply(column);
        next.draw(rng, self.who);
        (next, won)
    }

    /// Cards placed so far.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move.
    pub fn active(&self) -> Color {
        self.who
    }

    /// The card `side` will play next, if its deck was not exhausted.
    pub fn top_card(&self, side: Color) -> Option<Card> {
        self.top[side.index()]
    }

    /// Copies of `value` in `side`'s color not on the board or showing.
    pub fn unseen(&self, side: Color, value: u8) -> u8 {
        self.unseen[side.index()][usize::from(value - 1)]
    }

    /// Cards `side` can still draw.
    pub fn unseen_total(&self, side: Color) -> u32 {
        self.unseen[side.index()].iter().map(|&c| u32::from(c)).sum()
    }

    /// The side to move has no card, so the game ends drawn.
    pub fn is_tie(&self) -> bool {
        self.top[self.who.index()].is_none()
    }
}

impl GameState for State {
    type Side = Color;
    type Chance = u8;

    fn is_terminal(&self) -> bool {
        self.is_tie()
    }

    fn active_side(&self) -> Color {
        self.who
    }

    /// With one column, placing left of it mirrors placing right of it.
    fn legal_moves(&self) -> Vec<Move> {
        match self.board.columns() {
            0 => vec![-1],
            1 => vec![-1, 0],
            n => (-1..=n as Move).collect(),
        }
    }

    fn apply(&self, mv: Move) -> (Self, bool) {
        let mut next = self.clone();
        let Some(card) = next.top[self.who.index()].take() else {
            panic!("{} has no card to play", self.who);
        };
        next.board.place(mv, card);
        next.who = self.who.other();
        let won = next.board.is_win_involving(mv);
        (next, won)
    }

    /// Values the side that just moved may draw, weighted by unseen copies.
    fn chance_outcomes(&self) -> Vec<(u8, u32)> {
        let mover = self.who.other();
        (1..=MAX_VALUE)
            .map(|value| (value, u32::from(self.unseen(mover, value))))
            .filter(|&(_, count)| count > 0)
            .collect()
    }

    fn apply_chance(&self, value: u8) -> Self {
        let mut next = self.clone();
        next.reveal(self.who.other(), value);
        next
    }

    fn forced_response(&self) -> ForcedResponse {
        match self.top[self.who.other().index()] {
            Some(card) => self.board.threats(card),
            None => ForcedResponse::None,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board.render())?;
        for side in Color::ALL {
            match self.top_card(side) {
                Some(card) => writeln!(f, "{side}'s top card: {card}")?,
                None => writeln!(f, "{side}'s top card: ..")?,
            }
        }
        write!(f, "{} to move", self.who)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn position(board: &str, who: Color, red: Option<&str>, black: Option<&str>) -> State {
        State::new(who, red.map(card), black.map(card), board.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_new_counts_unseen() {
        let s = position("3r 3b | 5r", Color::Black, Some("3r"), Some("7b"));
        assert_eq!(s.unseen(Color::Red, 3), 0);
        assert_eq!(s.unseen(Color::Red, 5), 1);
        assert_eq!(s.unseen(Color::Black, 3), 1);
        assert_eq!(s.unseen(Color::Black, 7), 1);
        assert_eq!(s.unseen_total(Color::Red), 11);
        assert_eq!(s.unseen_total(Color::Black), 12);
    }

    #[test]
    fn test_new_rejects_bad_positions() {
        let err = State::new(Color::Red, Some(card("3r")), None, "3r 3r".parse().unwrap()).unwrap_err();
        assert_eq!(err, PositionError::TooManyCopies { card: card("3r"), count: 3 });

        let err = State::new(Color::Red, Some(card("3b")), None, Board::default()).unwrap_err();
        assert_eq!(err, PositionError::WrongColor { side: Color::Red, card: card("3b") });
    }

    #[test]
    fn test_legal_moves_by_width() {
        assert_eq!(position("", Color::Red, Some("1r"), None).legal_moves(), vec![-1]);
        assert_eq!(position("2b", Color::Red, Some("1r"), None).legal_moves(), vec![-1, 0]);
        assert_eq!(position("2b | 3b", Color::Red, Some("1r"), None).legal_moves(), vec![-1, 0, 1, 2]);
    }

    #[test]
    fn test_apply_then_reveal() {
        let s = position("5r 4r", Color::Red, Some("6r"), Some("1b"));
        let (next, won) = s.apply(0);
        assert!(won);
        assert_eq!(next.active(), Color::Black);
        assert_eq!(next.top_card(Color::Red), None);

        let outcomes = next.chance_outcomes();
        assert_eq!(outcomes.len(), 7);
        assert_eq!(outcomes.iter().map(|&(_, w)| w).sum::<u32>(), 11);
        assert!(outcomes.contains(&(6, 1)));

        let revealed = next.apply_chance(7);
        assert_eq!(revealed.top_card(Color::Red), Some(card("7r")));
        assert_eq!(revealed.unseen(Color::Red, 7), 1);
        // the chance state itself is untouched
        assert_eq!(next.unseen(Color::Red, 7), 2);
    }

    #[test]
    fn test_tie_when_deck_runs_out() {
        let s = position("", Color::Red, None, Some("1b"));
        assert!(s.is_terminal());
    }

    #[test]
    fn test_forced_response_uses_opponent_card() {
        let s = position("5b 4b", Color::Red, Some("2r"), Some("6b"));
        assert_eq!(s.forced_response(), ForcedResponse::Single(0));
        let s = position("5b 4b", Color::Red, Some("2r"), None);
        assert_eq!(s.forced_response(), ForcedResponse::None);
    }

    #[test]
    fn test_deal_and_play() {
        let mut rng = SmallRng::seed_from_u64(3);
        let s = State::deal(&mut rng);
        assert_eq!(s.active(), Color::Red);
        assert_eq!(s.unseen_total(Color::Red), 13);
        assert_eq!(s.unseen_total(Color::Black), 13);

        let (next, won) = s.play(&mut rng, -1);
        assert!(!won);
        assert_eq!(next.board().columns(), 1);
        assert_eq!(next.active(), Color::Black);
        assert!(next.top_card(Color::Red).is_some());
        assert_eq!(next.unseen_total(Color::Red), 12);
    }

    #[test]
    fn test_draw_exhausts_deck() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = State::deal(&mut rng);
        for _ in 0..13 {
            s.draw(&mut rng, Color::Black);
        }
        assert_eq!(s.unseen_total(Color::Black), 0);
        assert!(s.top_card(Color::Black).is_some());
        s.draw(&mut rng, Color::Black);
        assert_eq!(s.top_card(Color::Black), None);
    }
}
