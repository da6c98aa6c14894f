//! Best-first search engine with identity-indexed frontier, relaxation, and
//! a cooperative, deadline-bounded run loop.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::config::SearchConfig;
use crate::error::{ConfigError, ContractViolation, SearchError};
use crate::frontier::Frontier;
use crate::node::{extract_action_sequence, Classification, ScoredNode, SearchNode, SearchState};
use crate::stats::SearchStats;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Neighbor enumeration for a state space.
///
/// Implementations see only the caller's state value, never engine
/// bookkeeping, and must not depend on call order for their results.
pub trait Neighbors<S>: Send + Sync {
    /// States reachable from `state` in one step, in a stable order.
    fn neighbors(&self, state: &S) -> Vec<S>;
}

impl<S, F> Neighbors<S> for F
where
    F: Fn(&S) -> Vec<S> + Send + Sync,
{
    fn neighbors(&self, state: &S) -> Vec<S> {
        self(state)
    }
}

/// Remaining-cost estimate. Convention: finite and non-negative; the engine
/// rejects anything else as a contract violation.
pub trait Heuristic<S>: Send + Sync {
    fn estimate(&self, state: &S) -> f64;
}

impl<S, F> Heuristic<S> for F
where
    F: Fn(&S) -> f64 + Send + Sync,
{
    fn estimate(&self, state: &S) -> f64 {
        self(state)
    }
}

type CompleteFn<A> = Box<dyn FnOnce(SearchOutcome<A>) + Send>;
type TimeoutFn = Box<dyn FnOnce() + Send>;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Value delivered to `on_complete`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SearchOutcome<A> {
    pub success: bool,
    /// Actions from the initial state to the goal. `actions[0]` is the
    /// initial state's action (`None`). Empty when no path exists.
    pub actions: Vec<Option<A>>,
    /// `actions.len() - 1` on success, `0` otherwise.
    pub cost: usize,
}

impl<A> SearchOutcome<A> {
    pub fn solved(actions: Vec<Option<A>>) -> Self {
        let cost = actions.len().saturating_sub(1);
        Self {
            success: true,
            actions,
            cost,
        }
    }

    pub fn no_path() -> Self {
        Self {
            success: false,
            actions: Vec::new(),
            cost: 0,
        }
    }
}

/// Engine lifecycle. `Solved`, `Unsolvable`, `TimedOut` and `Faulted` are
/// terminal; once entered no further expansion happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// Constructed, no step taken yet.
    Idle,
    Running,
    /// A goal was reached; `on_complete` received the path.
    Solved,
    /// The frontier ran dry; `on_complete` received the no-path outcome.
    Unsolvable,
    /// The deadline passed; only `on_timeout` was invoked.
    TimedOut,
    /// An oracle contract violation aborted the run; no callback was invoked.
    Faulted,
}

impl SearchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Solved | Self::Unsolvable | Self::TimedOut | Self::Faulted
        )
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Solved => write!(f, "solved"),
            Self::Unsolvable => write!(f, "unsolvable"),
            Self::TimedOut => write!(f, "timed_out"),
            Self::Faulted => write!(f, "faulted"),
        }
    }
}

/// Final status and counters of a spawned search.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SearchReport {
    pub status: SearchStatus,
    pub stats: SearchStats,
}

// ---------------------------------------------------------------------------
// SearchOptions
// ---------------------------------------------------------------------------

/// Construction options for [`AsyncAstar`].
///
/// `initial`, `neighbors` and `on_complete` are required; everything else has
/// a default (zero heuristic, no timeout callback, unbounded time). Tunables
/// from a [`SearchConfig`] can be applied with [`SearchOptions::config`]; an
/// explicit [`SearchOptions::timeout`] overrides `timeout_ms`.
pub struct SearchOptions<S: SearchState> {
    initial: Option<S>,
    neighbors: Option<Box<dyn Neighbors<S>>>,
    heuristic: Option<Box<dyn Heuristic<S>>>,
    on_complete: Option<CompleteFn<S::Action>>,
    on_timeout: Option<TimeoutFn>,
    timeout: Option<Duration>,
    config: SearchConfig,
}

impl<S: SearchState> Default for SearchOptions<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SearchState> SearchOptions<S> {
    pub fn new() -> Self {
        Self {
            initial: None,
            neighbors: None,
            heuristic: None,
            on_complete: None,
            on_timeout: None,
            timeout: None,
            config: SearchConfig::default(),
        }
    }

    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    pub fn neighbors(mut self, neighbors: impl Neighbors<S> + 'static) -> Self {
        self.neighbors = Some(Box::new(neighbors));
        self
    }

    pub fn heuristic(mut self, heuristic: impl Heuristic<S> + 'static) -> Self {
        self.heuristic = Some(Box::new(heuristic));
        self
    }

    /// Invoked exactly once with the final outcome, unless the run times out
    /// or faults.
    pub fn on_complete(
        mut self,
        on_complete: impl FnOnce(SearchOutcome<S::Action>) + Send + 'static,
    ) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    /// Invoked exactly once if the deadline passes before completion.
    pub fn on_timeout(mut self, on_timeout: impl FnOnce() + Send + 'static) -> Self {
        self.on_timeout = Some(Box::new(on_timeout));
        self
    }

    /// Wall-clock budget measured from construction. Zero means unbounded.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the options and construct an idle engine.
    pub fn build(self) -> Result<AsyncAstar<S>, SearchError> {
        AsyncAstar::new(self)
    }
}

// ---------------------------------------------------------------------------
// AsyncAstar
// ---------------------------------------------------------------------------

/// Best-first (A*) search engine.
///
/// Expands the lowest `depth + heuristic` node first. Nodes live in an arena
/// and point at their parent by index; the frontier holds arena indices keyed
/// by state identity; the closed map records expanded and unsolvable states.
///
/// Drive it with [`AsyncAstar::step`] for one expansion at a time, with
/// [`AsyncAstar::run`] as a cooperative future, or with
/// [`AsyncAstar::spawn`] as a tokio task.
pub struct AsyncAstar<S: SearchState> {
    neighbors: Box<dyn Neighbors<S>>,
    heuristic: Option<Box<dyn Heuristic<S>>>,
    on_complete: Option<CompleteFn<S::Action>>,
    on_timeout: Option<TimeoutFn>,
    config: SearchConfig,
    started: Instant,
    deadline: Option<Instant>,

    arena: Vec<SearchNode<S>>,
    frontier: Frontier<ScoredNode<S::Id>>,
    closed: HashMap<S::Id, usize>,

    status: SearchStatus,
    goal: Option<usize>,
    outcome: Option<SearchOutcome<S::Action>>,
    stats: SearchStats,
}

impl<S: SearchState> AsyncAstar<S> {
    /// Validate `options` and seed the frontier with the initial node.
    ///
    /// Fails with [`ConfigError`] if a required option is missing, or with
    /// [`ContractViolation`] if the heuristic rejects the initial state.
    /// No expansion happens here.
    pub fn new(options: SearchOptions<S>) -> Result<Self, SearchError> {
        let initial = options.initial.ok_or(ConfigError::MissingInitial)?;
        let neighbors = options.neighbors.ok_or(ConfigError::MissingNeighbors)?;
        let on_complete = options.on_complete.ok_or(ConfigError::MissingOnComplete)?;
        options.config.validate();

        let started = Instant::now();
        let timeout = options
            .timeout
            .or_else(|| options.config.timeout())
            .filter(|t| !t.is_zero());
        let deadline = timeout.and_then(|t| started.checked_add(t));

        let heuristic = options.heuristic;
        let h = evaluate_heuristic(heuristic.as_deref(), &initial, 0)?;
        let root = SearchNode::root(initial, h);

        let mut engine = Self {
            neighbors,
            heuristic,
            on_complete: Some(on_complete),
            on_timeout: options.on_timeout,
            config: options.config,
            started,
            deadline,
            arena: Vec::new(),
            frontier: Frontier::new(),
            closed: HashMap::new(),
            status: SearchStatus::Idle,
            goal: None,
            outcome: None,
            stats: SearchStats::default(),
        };

        // An unsolvable start is closed immediately and never expanded.
        if root.classification() == Classification::Unsolvable {
            engine.closed.insert(root.identity.clone(), 0);
            engine.arena.push(root);
            engine.stats.unsolvable_recorded += 1;
        } else {
            engine.push_frontier(root);
        }

        tracing::debug!(
            timeout_ms = timeout.map(|t| t.as_millis() as u64),
            reopen_closed = engine.config.reopen_closed,
            "Search initialized"
        );
        Ok(engine)
    }

    /// Perform one expansion step and return the resulting status.
    ///
    /// Checks the deadline, extracts the best frontier node, closes it, and
    /// processes its neighbors until one of them is a goal. Calling `step` on
    /// a terminal engine is a no-op.
    pub fn step(&mut self) -> Result<SearchStatus, SearchError> {
        if self.status.is_terminal() {
            return Ok(self.status);
        }
        self.status = SearchStatus::Running;

        match self.expand_next() {
            Ok(()) => Ok(self.status),
            Err(err) => {
                self.status = SearchStatus::Faulted;
                self.record_wall_time();
                tracing::warn!(error = %err, "Search aborted");
                Err(err)
            }
        }
    }

    /// Step until a terminal status, yielding to the scheduler every
    /// `yield_every` steps so deadlines and outer timeouts are observed.
    pub async fn run(&mut self) -> Result<SearchStatus, SearchError> {
        let yield_every = self.config.yield_interval();
        let mut since_yield = 0;
        loop {
            let status = self.step()?;
            if status.is_terminal() {
                return Ok(status);
            }
            since_yield += 1;
            if since_yield >= yield_every {
                since_yield = 0;
                tokio::task::yield_now().await;
            }
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// The outcome passed to `on_complete`, once the engine is solved or
    /// unsolvable.
    pub fn outcome(&self) -> Option<&SearchOutcome<S::Action>> {
        self.outcome.as_ref()
    }

    /// Re-walk the goal node's parent chain. `None` until solved.
    pub fn solution_path(&self) -> Option<Vec<Option<S::Action>>> {
        self.goal
            .map(|goal| extract_action_sequence(&self.arena, goal))
    }

    /// All nodes created so far, indexed by arena position.
    pub fn nodes(&self) -> &[SearchNode<S>] {
        &self.arena
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }

    /// The node currently on the frontier for `id`.
    pub fn frontier_node(&self, id: &S::Id) -> Option<&SearchNode<S>> {
        self.frontier
            .lookup(id)
            .map(|entry| &self.arena[entry.node_index])
    }

    /// The best known closed node for `id`.
    pub fn closed_node(&self, id: &S::Id) -> Option<&SearchNode<S>> {
        self.closed.get(id).map(|&idx| &self.arena[idx])
    }

    // -----------------------------------------------------------------------
    // Expansion
    // -----------------------------------------------------------------------

    fn expand_next(&mut self) -> Result<(), SearchError> {
        if self.deadline_passed() {
            self.finish_timed_out();
            return Ok(());
        }

        let Some(current) = self.frontier.extract_min() else {
            self.finish_unsolvable();
            return Ok(());
        };
        let current_idx = current.node_index;
        self.closed.insert(current.identity, current_idx);
        self.stats.nodes_expanded += 1;

        // Goal neighbors never reach the frontier, so only a goal start
        // state can be extracted here.
        if self.arena[current_idx].classification() == Classification::Goal {
            self.finish_solved(current_idx);
            return Ok(());
        }

        tracing::debug!(
            node = current_idx,
            depth = self.arena[current_idx].depth,
            score = %current.score,
            frontier = self.frontier.len(),
            "Expanding node"
        );

        let neighbors = self.neighbors.neighbors(&self.arena[current_idx].state);
        for state in neighbors {
            if self.deadline_passed() {
                self.finish_timed_out();
                return Ok(());
            }
            self.visit_neighbor(current_idx, state)?;
            if self.status == SearchStatus::Solved {
                break;
            }
        }
        Ok(())
    }

    fn visit_neighbor(&mut self, parent_idx: usize, state: S) -> Result<(), SearchError> {
        let depth = self.arena[parent_idx].depth + 1;
        if state.action().is_none() {
            return Err(ContractViolation::MissingAction { depth }.into());
        }
        let h = evaluate_heuristic(self.heuristic.as_deref(), &state, depth)?;
        let candidate = SearchNode::new(state, Some(parent_idx), depth, h);
        self.stats.nodes_generated += 1;

        if candidate.classification() == Classification::Goal {
            let goal_idx = self.arena.len();
            self.arena.push(candidate);
            self.finish_solved(goal_idx);
            return Ok(());
        }

        if let Some(&closed_idx) = self.closed.get(&candidate.identity) {
            if self.arena[closed_idx].depth > candidate.depth {
                self.relax_closed(closed_idx, candidate);
            }
            return Ok(());
        }

        if candidate.classification() == Classification::Unsolvable {
            let idx = self.arena.len();
            self.closed.insert(candidate.identity.clone(), idx);
            self.arena.push(candidate);
            self.stats.unsolvable_recorded += 1;
            return Ok(());
        }

        if let Some(entry) = self.frontier.lookup(&candidate.identity) {
            let idx = entry.node_index;
            // Only a strictly cheaper path relaxes; anything else is dropped.
            if self.arena[idx].depth > candidate.depth {
                self.relax_frontier(idx, candidate);
            }
            return Ok(());
        }

        self.push_frontier(candidate);
        Ok(())
    }

    fn relax_frontier(&mut self, idx: usize, cheaper: SearchNode<S>) {
        tracing::trace!(
            node = idx,
            from_depth = self.arena[idx].depth,
            to_depth = cheaper.depth,
            "Relaxing frontier node"
        );
        self.arena[idx].relax_from(cheaper);
        let node = &self.arena[idx];
        let score = node.score;
        self.frontier
            .update_in_place(&node.identity, |entry| entry.score = score);
        self.stats.relaxations += 1;
    }

    fn relax_closed(&mut self, idx: usize, cheaper: SearchNode<S>) {
        tracing::trace!(
            node = idx,
            from_depth = self.arena[idx].depth,
            to_depth = cheaper.depth,
            "Relaxing closed node"
        );
        self.arena[idx].relax_from(cheaper);
        self.stats.relaxations += 1;

        if self.config.reopen_closed
            && self.arena[idx].classification() != Classification::Unsolvable
        {
            let entry = ScoredNode::of(&self.arena[idx], idx);
            self.closed.remove(&entry.identity);
            self.frontier.insert(entry);
            self.stats.reopened += 1;
            self.stats.peak_frontier_size = self.frontier.high_water();
        }
    }

    fn push_frontier(&mut self, node: SearchNode<S>) {
        let idx = self.arena.len();
        self.frontier.insert(ScoredNode::of(&node, idx));
        self.arena.push(node);
        self.stats.peak_frontier_size = self.frontier.high_water();
    }

    // -----------------------------------------------------------------------
    // Termination
    // -----------------------------------------------------------------------

    fn finish_solved(&mut self, goal_idx: usize) {
        self.goal = Some(goal_idx);
        self.status = SearchStatus::Solved;
        self.record_wall_time();

        let outcome = SearchOutcome::solved(extract_action_sequence(&self.arena, goal_idx));
        tracing::info!(
            cost = outcome.cost,
            nodes = self.stats.nodes_expanded,
            states = self.arena.len(),
            time_ms = self.stats.wall_time_ms,
            "Goal reached"
        );
        self.complete(outcome);
    }

    fn finish_unsolvable(&mut self) {
        self.status = SearchStatus::Unsolvable;
        self.record_wall_time();
        tracing::info!(
            nodes = self.stats.nodes_expanded,
            states = self.arena.len(),
            time_ms = self.stats.wall_time_ms,
            "Frontier exhausted without reaching a goal"
        );
        self.complete(SearchOutcome::no_path());
    }

    fn finish_timed_out(&mut self) {
        self.status = SearchStatus::TimedOut;
        self.record_wall_time();
        tracing::info!(
            nodes = self.stats.nodes_expanded,
            frontier = self.frontier.len(),
            elapsed_ms = self.stats.wall_time_ms,
            "Search timed out"
        );
        if let Some(on_timeout) = self.on_timeout.take() {
            on_timeout();
        }
    }

    fn complete(&mut self, outcome: SearchOutcome<S::Action>) {
        self.outcome = Some(outcome.clone());
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(outcome);
        }
    }

    fn deadline_passed(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn record_wall_time(&mut self) {
        self.stats.wall_time_ms = self.started.elapsed().as_millis() as u64;
        self.stats.peak_frontier_size = self.frontier.high_water();
    }
}

impl<S> AsyncAstar<S>
where
    S: SearchState + Send + 'static,
    S::Id: Send,
    S::Action: Send,
{
    /// Validate `options` synchronously, then run the search as a tokio task.
    ///
    /// Configuration errors are returned here, before anything is scheduled.
    /// Must be called from within a tokio runtime.
    pub fn spawn(options: SearchOptions<S>) -> Result<SearchHandle, SearchError> {
        let mut engine = options.build()?;
        let task = tokio::spawn(async move {
            let status = engine.run().await?;
            Ok::<_, SearchError>(SearchReport {
                status,
                stats: engine.stats().clone(),
            })
        });
        Ok(SearchHandle { task })
    }
}

fn evaluate_heuristic<S>(
    heuristic: Option<&dyn Heuristic<S>>,
    state: &S,
    depth: u32,
) -> Result<f64, ContractViolation> {
    let value = heuristic.map_or(0.0, |h| h.estimate(state));
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ContractViolation::InvalidHeuristic { value, depth })
    }
}

// ---------------------------------------------------------------------------
// SearchHandle
// ---------------------------------------------------------------------------

/// Handle to a search spawned with [`AsyncAstar::spawn`].
pub struct SearchHandle {
    task: tokio::task::JoinHandle<Result<SearchReport, SearchError>>,
}

impl SearchHandle {
    /// Wait for the search task to finish.
    pub async fn join(self) -> Result<SearchReport, SearchError> {
        self.task.await?
    }

    /// True once the task has stopped, so [`join`](Self::join) will not wait.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
