//! Search entry points
//!
//! The caller's thread builds the deadline and the root, runs the root's
//! expansion inline (so first-level children are enumerated and scheduled
//! before it blocks), then waits on the root bridge. Everything below the
//! root runs on the worker pool. Before returning, the caller also waits for
//! the pool to drain so no work from this search outlives the call.

use crate::bridge::Bridge;
use crate::config::SearchConfig;
use crate::deadline::Deadline;
use crate::diagnostics::Diagnostics;
use crate::error::SearchError;
use crate::node::{Context, Node};
use crate::outcome::Evaluation;
use crate::scheduler::Scheduler;
use crate::state::GameState;
use crossbeam_channel::select;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

/// Search engine owning a fixed worker pool.
pub struct Engine {
    config: SearchConfig,
    scheduler: Scheduler,
}

impl Engine {
    /// Validate `config` and start its worker pool.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let scheduler = Scheduler::new(config.workers)?;
        log::debug!("engine started with {} workers", scheduler.workers());
        Ok(Engine { config, scheduler })
    }

    /// Estimate the value of `state` and its best move within `timeout`.
    ///
    /// With a zero timeout this is `leaf(state)` with no move. With an
    /// unbounded timeout the whole tree is explored. Counters from the
    /// previous call are cleared first.
    pub fn search<S, F>(&mut self, leaf: F, state: &S, timeout: Duration) -> Result<Evaluation, SearchError>
    where
        S: GameState,
        F: Fn(&S) -> f64 + Send + Sync + 'static,
    {
        self.scheduler.reset();
        let started = Instant::now();
        let deadline = Deadline::after(timeout);
        let spawner = self.scheduler.spawner().ok_or(SearchError::Disconnected)?;
        let context = Arc::new(Context {
            deadline,
            leaf: Box::new(leaf),
            spawner,
            config: self.config,
        });
        log::debug!("search started for {:?} with timeout {:?}", state.active_side(), timeout);

        let (bridge, answer) = Bridge::open();
        let root = Node::root(state.clone(), context, bridge);
        root.run();

        let result = select! {
            recv(answer) -> result => result.map_err(|_| SearchError::Disconnected),
            recv(self.scheduler.panics()) -> message => {
                Err(SearchError::WorkerPanicked(message.unwrap_or_default()))
            }
        };
        self.scheduler.wait_idle();
        drop(root);

        let diagnostics = self.diagnostics();
        match &result {
            Ok(evaluation) => log::debug!(
                "search finished in {:?}: {} [{} scheduled, {} executed, depth {}]",
                started.elapsed(),
                evaluation,
                diagnostics.tasks_scheduled,
                diagnostics.tasks_executed,
                diagnostics.max_depth,
            ),
            Err(e) => log::error!("search failed after {:?}: {}", started.elapsed(), e),
        }
        result
    }

    /// Counters of the most recent search.
    pub fn diagnostics(&self) -> Diagnostics {
        self.scheduler.counters().snapshot()
    }
}

static ENGINE: OnceLock<Mutex<Engine>> = OnceLock::new();

fn shared_engine() -> Result<&'static Mutex<Engine>, SearchError> {
    if let Some(engine) = ENGINE.get() {
        return Ok(engine);
    }
    let engine = Engine::new(SearchConfig::default())?;
    Ok(ENGINE.get_or_init(|| Mutex::new(engine)))
}

/// [`Engine::search`] on a process-wide engine with the default config.
///
/// Calls are serialized; each one resets the diagnostics read by
/// [`last_diagnostics`].
pub fn search<S, F>(leaf: F, state: &S, timeout: Duration) -> Result<Evaluation, SearchError>
where
    S: GameState,
    F: Fn(&S) -> f64 + Send + Sync + 'static,
{
    let mut engine = shared_engine()?.lock().map_err(|_| SearchError::Poisoned)?;
    engine.search(leaf, state, timeout)
}

/// Counters of the last call to [`search`].
pub fn last_diagnostics() -> Result<Diagnostics, SearchError> {
    let engine = shared_engine()?.lock().map_err(|_| SearchError::Poisoned)?;
    Ok(engine.diagnostics())
}
