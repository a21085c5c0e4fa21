//! Scripted game trees for tests and benchmarks
//!
//! A [`ScriptedGame`] is a flat array of spots indexed by id, walked by a
//! [`Scripted`] cursor that implements [`GameState`]. Decision spots list
//! their moves (each either an immediate win or a chance spot), an optional
//! scripted threat, and the value the leaf function reports there. Chance
//! spots list weighted reveals leading to decision spots.
//!
//! Two-ply fixture (values from the side to move at each spot):
//!   0: Decision  [1 → 1, 2 → 2]
//!   1: Chance    [w1 → 3, w2 → 4]      value -(0.6 - 2·0.15)/3 = -0.1
//!   2: Chance    [w1 → 5, w1 → 6]      value -(-0.5 + 0.1)/2   =  0.2
//!   3..6: terminal decisions with leaf values 0.6, -0.15, -0.5, 0.1

use crate::outcome::Move;
use crate::state::{ForcedResponse, GameState};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

pub type SpotId = usize;

/// Where a move leads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// The move wins on the spot.
    Win,
    /// The move leads to this chance spot.
    To(SpotId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Spot {
    Decision {
        moves: Vec<(Move, Step)>,
        forced: ForcedResponse,
        /// The side to move has no card; moves are listed but unplayable.
        tie: bool,
        leaf: f64,
    },
    Chance {
        /// `(weight, decision spot)` per reveal.
        outcomes: Vec<(u32, SpotId)>,
        leaf: f64,
    },
}

impl Spot {
    /// Decision spot with no moves.
    pub fn terminal(leaf: f64) -> Self {
        Spot::Decision {
            moves: vec![],
            forced: ForcedResponse::None,
            tie: true,
            leaf,
        }
    }

    pub fn decision(moves: Vec<(Move, Step)>, leaf: f64) -> Self {
        Spot::Decision {
            moves,
            forced: ForcedResponse::None,
            tie: false,
            leaf,
        }
    }

    pub fn chance(outcomes: Vec<(u32, SpotId)>) -> Self {
        Spot::Chance { outcomes, leaf: 0.0 }
    }

    fn leaf(&self) -> f64 {
        match self {
            Spot::Decision { leaf, .. } | Spot::Chance { leaf, .. } => *leaf,
        }
    }
}

/// Flat array of spots; spot 0 is the root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedGame {
    pub spots: Vec<Spot>,
}

impl ScriptedGame {
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    fn push(&mut self, spot: Spot) -> SpotId {
        self.spots.push(spot);
        self.spots.len() - 1
    }
}

/// Cursor into a shared [`ScriptedGame`].
#[derive(Debug, Clone)]
pub struct Scripted {
    game: Arc<ScriptedGame>,
    at: SpotId,
    depth: usize,
}

impl Scripted {
    pub fn root(game: ScriptedGame) -> Self {
        assert!(!game.is_empty(), "scripted game has no root");
        Scripted {
            game: Arc::new(game),
            at: 0,
            depth: 0,
        }
    }

    pub fn at(&self) -> SpotId {
        self.at
    }

    /// Plies walked from the root, reveals included.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Scripted heuristic value of the current spot.
    pub fn leaf(&self) -> f64 {
        self.spot().leaf()
    }

    fn spot(&self) -> &Spot {
        &self.game.spots[self.at]
    }

    fn step_to(&self, at: SpotId) -> Self {
        Scripted {
            game: Arc::clone(&self.game),
            at,
            depth: self.depth + 1,
        }
    }
}

/// Leaf function reporting each spot's scripted value.
pub fn leaf_value(state: &Scripted) -> f64 {
    state.leaf()
}

impl GameState for Scripted {
    type Side = usize;
    type Chance = usize;

    fn is_terminal(&self) -> bool {
        match self.spot() {
            Spot::Decision { moves, tie, .. } => *tie || moves.is_empty(),
            Spot::Chance { .. } => false,
        }
    }

    fn active_side(&self) -> usize {
        (self.depth / 2) % 2
    }

    fn legal_moves(&self) -> Vec<Move> {
        match self.spot() {
            Spot::Decision { moves, .. } => moves.iter().map(|(mv, _)| *mv).collect(),
            Spot::Chance { .. } => vec![],
        }
    }

    fn apply(&self, mv: Move) -> (Self, bool) {
        let Spot::Decision { moves, .. } = self.spot() else {
            panic!("move {mv} applied at chance spot {}", self.at);
        };
        match moves.iter().find(|(m, _)| *m == mv) {
            Some((_, Step::Win)) => (self.step_to(self.at), true),
            Some((_, Step::To(next))) => (self.step_to(*next), false),
            None => panic!("move {mv} is not scripted at spot {}", self.at),
        }
    }

    fn chance_outcomes(&self) -> Vec<(usize, u32)> {
        match self.spot() {
            Spot::Chance { outcomes, .. } => outcomes
                .iter()
                .enumerate()
                .map(|(i, (weight, _))| (i, *weight))
                .collect(),
            Spot::Decision { .. } => vec![],
        }
    }

    fn apply_chance(&self, outcome: usize) -> Self {
        match self.spot() {
            Spot::Chance { outcomes, .. } => self.step_to(outcomes[outcome].1),
            Spot::Decision { .. } => panic!("reveal applied at decision spot {}", self.at),
        }
    }

    fn forced_response(&self) -> ForcedResponse {
        match self.spot() {
            Spot::Decision { forced, .. } => *forced,
            Spot::Chance { .. } => ForcedResponse::None,
        }
    }
}

/// Exact value of [`two_ply_tree`] for the side to move at the root (move 2).
pub const TWO_PLY_VALUE: f64 = 0.2;

/// Hand-computable tree: two moves, weighted reveals, terminal leaves.
pub fn two_ply_tree() -> ScriptedGame {
    ScriptedGame {
        spots: vec![
            Spot::decision(vec![(1, Step::To(1)), (2, Step::To(2))], 0.3),
            Spot::chance(vec![(1, 3), (2, 4)]),
            Spot::chance(vec![(1, 5), (1, 6)]),
            Spot::terminal(0.6),
            Spot::terminal(-0.15),
            Spot::terminal(-0.5),
            Spot::terminal(0.1),
        ],
    }
}

/// Root whose second move wins immediately.
pub fn winning_tree() -> ScriptedGame {
    ScriptedGame {
        spots: vec![
            Spot::decision(vec![(1, Step::To(1)), (2, Step::Win), (3, Step::To(1))], 0.0),
            Spot::chance(vec![(1, 2)]),
            Spot::terminal(0.5),
        ],
    }
}

/// Root threatened once; only move 2 answers, although 1 and 3 look better.
pub fn forced_tree() -> ScriptedGame {
    ScriptedGame {
        spots: vec![
            Spot::Decision {
                moves: vec![(1, Step::To(1)), (2, Step::To(2)), (3, Step::To(3))],
                forced: ForcedResponse::Single(2),
                tie: false,
                leaf: 0.0,
            },
            Spot::chance(vec![(1, 4)]),
            Spot::chance(vec![(1, 5)]),
            Spot::chance(vec![(1, 6)]),
            Spot::terminal(-0.9),
            Spot::terminal(0.5),
            Spot::terminal(-0.8),
        ],
    }
}

/// Root facing two threats. Its only move would win, but the threat check
/// comes first.
pub fn double_threat_tree() -> ScriptedGame {
    ScriptedGame {
        spots: vec![Spot::Decision {
            moves: vec![(1, Step::Win)],
            forced: ForcedResponse::DoubleThreat,
            tie: false,
            leaf: 0.0,
        }],
    }
}

/// One listed move, no card to play it with, and nothing left to reveal.
pub fn lone_move_tree() -> ScriptedGame {
    ScriptedGame {
        spots: vec![
            Spot::Decision {
                moves: vec![(1, Step::To(1))],
                forced: ForcedResponse::None,
                tie: true,
                leaf: 0.0,
            },
            Spot::chance(vec![]),
        ],
    }
}

/// Move 1 leads to a reveal where the opponent faces a double threat on every
/// card, a proven win; move 2 leads to a large ordinary subtree.
pub fn decisive_reveal_tree() -> ScriptedGame {
    let mut game = ScriptedGame {
        spots: vec![
            Spot::decision(vec![(1, Step::To(1)), (2, Step::To(2))], 0.0),
            Spot::chance(vec![(2, 3), (1, 3)]),
            Spot::chance(vec![]),
            Spot::Decision {
                moves: vec![(1, Step::Win)],
                forced: ForcedResponse::DoubleThreat,
                tie: false,
                leaf: 0.0,
            },
        ],
    };
    let mut rng = SmallRng::seed_from_u64(7);
    let mut outcomes = Vec::new();
    for _ in 0..3 {
        outcomes.push((1, grow_decision(&mut game, &mut rng, 4)));
    }
    game.spots[2] = Spot::chance(outcomes);
    game
}

/// Seeded random tree with at most `depth` decision plies below the root.
pub fn random_tree(seed: u64, depth: usize) -> ScriptedGame {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut game = ScriptedGame::default();
    grow_decision(&mut game, &mut rng, depth);
    game
}

fn grow_decision(game: &mut ScriptedGame, rng: &mut SmallRng, depth: usize) -> SpotId {
    let id = game.push(Spot::chance(vec![]));
    let leaf = rng.random_range(-1.0..1.0);
    if depth == 0 || rng.random_bool(0.1) {
        game.spots[id] = Spot::terminal(leaf);
        return id;
    }

    let count = rng.random_range(1..=3);
    let mut moves = Vec::with_capacity(count);
    for i in 0..count {
        let mv = i as Move - 1;
        if rng.random_bool(0.05) {
            moves.push((mv, Step::Win));
        } else {
            moves.push((mv, Step::To(grow_chance(game, rng, depth))));
        }
    }
    let forced = match rng.random_range(0..20) {
        0 => ForcedResponse::DoubleThreat,
        1 => ForcedResponse::Single(moves[rng.random_range(0..moves.len())].0),
        _ => ForcedResponse::None,
    };
    game.spots[id] = Spot::Decision {
        moves,
        forced,
        tie: false,
        leaf,
    };
    id
}

fn grow_chance(game: &mut ScriptedGame, rng: &mut SmallRng, depth: usize) -> SpotId {
    let id = game.push(Spot::chance(vec![]));
    let leaf = rng.random_range(-1.0..1.0);
    let count = if rng.random_bool(0.1) { 0 } else { rng.random_range(1..=3) };
    let mut outcomes = Vec::with_capacity(count);
    for _ in 0..count {
        let weight = rng.random_range(1..=2);
        outcomes.push((weight, grow_decision(game, rng, depth - 1)));
    }
    game.spots[id] = Spot::Chance { outcomes, leaf };
    id
}
