//! Leaf evaluators for positions the search will not expand

use crate::state::State;

/// Uniformly ±1, ignoring the position. Noise that keeps unexplored lines
/// from looking equal.
pub fn coin_flip(_: &State) -> f64 {
    if rand::random::<bool>() {
        1.0
    } else {
        -1.0
    }
}

/// Every unexplored position is even.
pub fn neutral(_: &State) -> f64 {
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::card::Color;

    #[test]
    fn test_values_in_range() {
        let s = State::new(Color::Red, None, None, Board::default()).unwrap();
        assert_eq!(neutral(&s), 0.0);
        for _ in 0..20 {
            assert_eq!(coin_flip(&s).abs(), 1.0);
        }
    }
}
