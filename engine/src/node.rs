//! Search tree nodes and their lifecycle
//!
//! A node is created when its parent expands, runs its expansion step on
//! whichever thread picked it up, and reports its result upward exactly once.
//! Parents own their children (`Arc`) for as long as they live themselves, and
//! the search call owns the root until the pool has drained, so no node is
//! released before it has notified. Children hold only a `Weak`
//! back-reference, so there are no ownership cycles. The root's parent is the
//! [`Bridge`] instead of another node.
//!
//! Lifecycle: Created → Expanding → AwaitingChildren → Combined → Notified.
//! Leaves and short-circuits skip straight from Expanding to Notified.

use crate::bridge::Bridge;
use crate::chance;
use crate::config::SearchConfig;
use crate::deadline::Deadline;
use crate::decision::{self, Opening};
use crate::diagnostics::Counters;
use crate::gate::Gate;
use crate::outcome::{Evaluation, Move, Outcome, NO_MOVE};
use crate::scheduler::Spawner;
use crate::state::GameState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

/// Injected heuristic for positions that will not be expanded.
pub type LeafEval<S> = dyn Fn(&S) -> f64 + Send + Sync;

/// Everything a search shares read-only across its tree.
pub(crate) struct Context<S: GameState> {
    pub deadline: Deadline,
    pub leaf: Box<LeafEval<S>>,
    pub spawner: Spawner,
    pub config: SearchConfig,
}

impl<S: GameState> Context<S> {
    fn counters(&self) -> &Counters {
        self.spawner.counters()
    }
}

/// The two node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    /// The side to move picks among legal moves.
    Decision,
    /// A hidden card is revealed after `mv` was played.
    Chance { mv: Move },
}

/// Who hears about this node's result.
pub(crate) enum Parent<S: GameState> {
    Node(Weak<Node<S>>),
    Bridge(Bridge),
}

/// How a finished child reports to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notice {
    Finished,
    /// A chance child proved a win for the parent's mover.
    Decisive,
}

struct Branch<S: GameState> {
    node: Arc<Node<S>>,
    weight: u32,
}

pub(crate) struct Node<S: GameState> {
    kind: Kind,
    depth: usize,
    state: S,
    parent: Parent<S>,
    gate: Gate,
    /// Written once, before notifying upward.
    result: OnceLock<Evaluation>,
    /// Filled by expansion, then left alone. Children under a fast-exited
    /// node still arrive and combine, so they must outlive the early release.
    children: Mutex<Vec<Branch<S>>>,
    notified: AtomicBool,
    context: Arc<Context<S>>,
}

impl<S: GameState> Node<S> {
    /// Top-level decision node reporting into `bridge`.
    pub fn root(state: S, context: Arc<Context<S>>, bridge: Bridge) -> Arc<Self> {
        Counters::bump(&context.counters().nodes);
        Arc::new(Node {
            kind: Kind::Decision,
            depth: 0,
            state,
            parent: Parent::Bridge(bridge),
            gate: Gate::new(),
            result: OnceLock::new(),
            children: Mutex::new(Vec::new()),
            notified: AtomicBool::new(false),
            context,
        })
    }

    fn child(self: &Arc<Self>, kind: Kind, state: S) -> Arc<Self> {
        Counters::bump(&self.context.counters().nodes);
        Arc::new(Node {
            kind,
            depth: self.depth + 1,
            state,
            parent: Parent::Node(Arc::downgrade(self)),
            gate: Gate::new(),
            result: OnceLock::new(),
            children: Mutex::new(Vec::new()),
            notified: AtomicBool::new(false),
            context: Arc::clone(&self.context),
        })
    }

    pub fn result(&self) -> Option<Evaluation> {
        self.result.get().copied()
    }

    /// Expansion step. Never blocks.
    pub fn run(self: &Arc<Self>) {
        self.context.counters().reached(self.depth);
        if self.abandoned() {
            Counters::bump(&self.context.counters().abandoned);
            return self.settle(Evaluation::new(Outcome::Heuristic(0.0), self.arrival_move()));
        }
        match self.kind {
            Kind::Decision => self.expand_decision(),
            Kind::Chance { mv } => self.expand_chance(mv),
        }
    }

    fn expand_decision(self: &Arc<Self>) {
        let context = &self.context;
        let expired = context.deadline.passed();
        match decision::open(&self.state, expired, context.config.forced_responses) {
            Opening::Leaf => self.settle(Evaluation::leaf((context.leaf)(&self.state))),
            Opening::Lost => self.settle(Evaluation::new(Outcome::Loss, NO_MOVE)),
            Opening::Won(mv) => self.settle(Evaluation::new(Outcome::Win, mv)),
            Opening::Branches(branches) => {
                let children = branches
                    .into_iter()
                    .map(|(mv, next)| Branch {
                        node: self.child(Kind::Chance { mv }, next),
                        weight: 1,
                    })
                    .collect();
                self.fan_out(children);
            }
        }
    }

    fn expand_chance(self: &Arc<Self>, mv: Move) {
        let context = &self.context;
        if context.deadline.passed() {
            let value = (context.leaf)(&self.state);
            return self.settle(Evaluation::new(Outcome::Heuristic(value), mv));
        }
        let children: Vec<Branch<S>> = chance::reveal(&self.state)
            .into_iter()
            .map(|(next, weight)| Branch {
                node: self.child(Kind::Decision, next),
                weight,
            })
            .collect();
        if children.is_empty() {
            return self.settle(Evaluation::new(Outcome::Heuristic(0.0), mv));
        }
        self.fan_out(children);
    }

    /// Arm the gate, then hand every child to the scheduler.
    fn fan_out(&self, children: Vec<Branch<S>>) {
        Counters::bump(&self.context.counters().expanded);
        let nodes: Vec<Arc<Node<S>>> = children.iter().map(|b| Arc::clone(&b.node)).collect();
        *self.lock_children() = children;
        self.gate.arm(nodes.len());
        for node in nodes {
            self.context.spawner.schedule(move || node.run());
        }
    }

    fn arrive(&self, notice: Notice) {
        let released = match (notice, self.kind) {
            (Notice::Finished, _) => self.gate.arrive(),
            (Notice::Decisive, Kind::Decision) if self.context.config.fast_exit => self.gate.force(),
            (Notice::Decisive, Kind::Decision) => self.gate.arrive(),
            (Notice::Decisive, Kind::Chance { .. }) => {
                unreachable!("chance node received a decisive notice")
            }
        };
        if released {
            self.combine();
        }
    }

    /// Runs on the unique thread that released the gate.
    fn combine(&self) {
        assert!(self.gate.is_released(), "combining with children outstanding");
        Counters::bump(&self.context.counters().combined);
        let children = self.lock_children();
        let result = match self.kind {
            Kind::Decision => {
                // children abandoned by the fast path have no result yet
                let finished = children.iter().filter_map(|b| b.node.result());
                decision::best(finished).expect("decision node combined with no finished child")
            }
            Kind::Chance { mv } => {
                let outcomes: Vec<(Outcome, u32)> = children
                    .iter()
                    .map(|b| {
                        let result = b.node.result().expect("chance node combined before every child finished");
                        (result.outcome, b.weight)
                    })
                    .collect();
                Evaluation::new(chance::expectation(&outcomes, self.context.config.win_ceiling), mv)
            }
        };
        drop(children);
        self.settle(result);
    }

    /// Record the result and notify the parent, exactly once.
    fn settle(&self, result: Evaluation) {
        assert!(self.result.set(result).is_ok(), "node result written twice");
        let already = self.notified.swap(true, Ordering::AcqRel);
        assert!(!already, "node notified its parent twice");
        Counters::bump(&self.context.counters().notified);

        match &self.parent {
            Parent::Bridge(bridge) => bridge.fulfil(result),
            Parent::Node(parent) => {
                let notice = match self.kind {
                    Kind::Chance { .. } if result.outcome.is_win() => Notice::Decisive,
                    _ => Notice::Finished,
                };
                // parents outlive their children for the whole search
                match parent.upgrade() {
                    Some(parent) => parent.arrive(notice),
                    None => log::warn!("node at depth {} outlived its parent", self.depth),
                }
            }
        }
    }

    /// True if some ancestor already combined without waiting for this branch.
    fn abandoned(&self) -> bool {
        let mut link = match &self.parent {
            Parent::Bridge(_) => return false,
            Parent::Node(parent) => parent.upgrade(),
        };
        loop {
            let Some(ancestor) = link else {
                return true;
            };
            if ancestor.gate.is_released() {
                return true;
            }
            link = match &ancestor.parent {
                Parent::Bridge(_) => return false,
                Parent::Node(parent) => parent.upgrade(),
            };
        }
    }

    fn arrival_move(&self) -> Move {
        match self.kind {
            Kind::Decision => NO_MOVE,
            Kind::Chance { mv } => mv,
        }
    }

    fn lock_children(&self) -> std::sync::MutexGuard<'_, Vec<Branch<S>>> {
        self.children.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
