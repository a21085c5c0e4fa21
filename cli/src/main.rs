//! fifteen CLI - self-play and position analysis
//!
//! Drives the search engine over real games so its moves, values and task
//! counts can be watched. Logging goes through `env_logger`; set `RUST_LOG`
//! (e.g. `RUST_LOG=debug`) to see per-search engine records.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use fifteen_engine::{Engine, GameState, SearchConfig};
use fifteen_game::eval::coin_flip;
use fifteen_game::{Board, Card, Color, State};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "Timed expectimax for the fifteen card game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Let the engine play both sides", alias = "play")]
    Selfplay {
        /// Games to play.
        #[arg(long, default_value_t = 1)]
        games: usize,
        /// Thinking time per move.
        #[arg(long, default_value_t = 300)]
        timeout_ms: u64,
        /// Seed for dealing; random if omitted.
        #[arg(long)]
        seed: Option<u64>,
        #[command(flatten)]
        engine: EngineArgs,
    },
    #[command(about = "Search one position and report the best move")]
    Analyze {
        /// Columns bottom to top, separated by `|`, e.g. "3r 6b | 1r".
        #[arg(long, default_value = "")]
        board: String,
        #[arg(long)]
        turn: Color,
        /// Red's top card, if any.
        #[arg(long)]
        red: Option<Card>,
        /// Black's top card, if any.
        #[arg(long)]
        black: Option<Card>,
        #[arg(long, default_value_t = 300)]
        timeout_ms: u64,
        #[command(flatten)]
        engine: EngineArgs,
    },
}

#[derive(Args)]
struct EngineArgs {
    /// Worker threads.
    #[arg(long, default_value_t = SearchConfig::default().workers)]
    workers: usize,
    /// Clamp on child values below a chance node with a proven win.
    #[arg(long, default_value_t = SearchConfig::default().win_ceiling)]
    win_ceiling: f64,
    /// Ignore opponent threats when enumerating moves.
    #[arg(long)]
    no_forced_responses: bool,
    /// Wait for every sibling even after a proven win.
    #[arg(long)]
    no_fast_exit: bool,
}

impl EngineArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig::default()
            .with_workers(self.workers)
            .with_win_ceiling(self.win_ceiling)
            .with_forced_responses(!self.no_forced_responses)
            .with_fast_exit(!self.no_fast_exit)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match Cli::parse().command {
        Command::Selfplay {
            games,
            timeout_ms,
            seed,
            engine,
        } => selfplay(games, Duration::from_millis(timeout_ms), seed, engine.config()),
        Command::Analyze {
            board,
            turn,
            red,
            black,
            timeout_ms,
            engine,
        } => {
            let board: Board = board.parse().context("parsing --board")?;
            let state = State::new(turn, red, black, board).context("building position")?;
            analyze(&state, Duration::from_millis(timeout_ms), engine.config())
        }
    }
}

fn selfplay(games: usize, timeout: Duration, seed: Option<u64>, config: SearchConfig) -> Result<()> {
    let mut engine = Engine::new(config).context("starting engine")?;
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let mut wins = [0usize; 2];
    let mut ties = 0usize;

    for game in 1..=games {
        let mut state = State::deal(&mut rng);
        log::info!("game {game} of {games}");
        loop {
            if state.is_terminal() {
                log::info!("tie game\n{state}");
                ties += 1;
                break;
            }
            let who = state.active();
            let result = engine.search(coin_flip, &state, timeout)?;
            let diagnostics = engine.diagnostics();
            let legal = state.legal_moves();
            let mv = if legal.contains(&result.mv) { result.mv } else { legal[0] };
            log::info!(
                "\n{state}\n{who} plays {mv} (value {}), {} tasks scheduled, {} run, depth {}",
                result.outcome,
                diagnostics.tasks_scheduled,
                diagnostics.tasks_executed,
                diagnostics.max_depth,
            );
            let (next, won) = state.play(&mut rng, mv);
            state = next;
            if won {
                log::info!("{who} wins\n{}", state.board().render());
                wins[who.index()] += 1;
                break;
            }
        }
    }

    println!(
        "{games} games: {} won by {}, {} won by {}, {ties} tied",
        wins[Color::Red.index()],
        Color::Red,
        wins[Color::Black.index()],
        Color::Black,
    );
    Ok(())
}

fn analyze(state: &State, timeout: Duration, config: SearchConfig) -> Result<()> {
    if state.is_terminal() {
        bail!("{} has no card to play; the game is already a tie", state.active());
    }
    let mut engine = Engine::new(config).context("starting engine")?;
    let result = engine.search(coin_flip, state, timeout)?;
    let diagnostics = engine.diagnostics();
    println!("{state}");
    println!("{}'s best move is {} (value {})", state.active(), result.mv, result.outcome);
    println!("{diagnostics:#?}");
    Ok(())
}
