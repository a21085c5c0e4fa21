//! fifteen Engine - deadline-bounded concurrent expectimax search
//!
//! This crate contains the search engine: a fixed worker pool, decision and
//! chance nodes joined by atomic fan-in gates, a shared deadline, and the
//! one-shot bridge that hands the root result back to the caller. Positions
//! are consumed only through the [`GameState`] trait.
//!
//! The engine knows nothing about the rules of any particular game.

mod bridge;
pub mod chance;
pub mod config;
pub mod deadline;
mod decision;
pub mod diagnostics;
pub mod error;
pub mod expectimax;
pub mod gate;
mod node;
pub mod outcome;
pub mod scheduler;
pub mod search;
pub mod state;
pub mod test_tree;

pub use config::SearchConfig;
pub use diagnostics::Diagnostics;
pub use error::SearchError;
pub use outcome::{Evaluation, Move, Outcome, NO_MOVE, WIN_SCORE};
pub use search::{last_diagnostics, search, Engine};
pub use state::{ForcedResponse, GameState};
