//! Search entry point and expansion loop.

use std::collections::{BTreeMap, HashMap, HashSet};

use pathtrace_kernel::grid::{Cell, Grid};

use crate::error::{SearchError, TraceError};
use crate::frame::{Frame, SearchStats, TerminationReason};
use crate::frontier::{FrontierPop, OpenFrontier};
use crate::policy::SearchPolicy;
use crate::trace::{reconstruct_path, Trace, TraceRecorder};

/// Result of a search execution.
///
/// Always carries the complete trace, whatever the termination reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub start: Cell,
    pub goal: Cell,
    /// Frames in pop order; index 0 is the pre-loop state.
    pub trace: Trace,
    /// `start..=goal`, or empty when the goal was not reached.
    pub path: Vec<Cell>,
    pub termination: TerminationReason,
    pub stats: SearchStats,
    /// Budget the run was executed under.
    pub policy: SearchPolicy,
}

impl SearchResult {
    /// Returns `true` if the search terminated because the goal was popped.
    #[must_use]
    pub fn is_goal_reached(&self) -> bool {
        self.termination == TerminationReason::GoalReached
    }

    #[must_use]
    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        self.trace.frames()
    }

    /// # Errors
    ///
    /// Returns [`TraceError::OutOfRange`] unless `index < frames().len()`.
    pub fn frame_at(&self, index: usize) -> Result<&Frame, TraceError> {
        self.trace.frame_at(index)
    }

    /// Path cost in edges, or `None` when unreachable.
    #[must_use]
    pub fn path_cost(&self) -> Option<u64> {
        u64::try_from(self.path.len()).ok()?.checked_sub(1)
    }
}

/// Mutable state owned by exactly one run.
///
/// Built fresh by every [`run_with_policy`] call and dropped when it returns,
/// so concurrent runs never share anything.
struct SearchContext {
    goal: Cell,
    g: HashMap<Cell, u64>,
    f: HashMap<Cell, u64>,
    parent: BTreeMap<Cell, Cell>,
    closed: Vec<Cell>,
    closed_set: HashSet<Cell>,
    frontier: OpenFrontier,
    recorder: TraceRecorder,
    pops: u64,
}

impl SearchContext {
    fn new(grid: &Grid, start: Cell, goal: Cell) -> Self {
        let mut ctx = Self {
            goal,
            g: HashMap::new(),
            f: HashMap::new(),
            parent: BTreeMap::new(),
            closed: Vec::new(),
            closed_set: HashSet::new(),
            frontier: OpenFrontier::new(),
            recorder: TraceRecorder::new(grid.size()),
            pops: 0,
        };
        let h = start.manhattan(goal);
        ctx.g.insert(start, 0);
        ctx.f.insert(start, h);
        ctx.frontier.push(start, h);
        ctx.record(None);
        ctx
    }

    fn record(&mut self, current: Option<Cell>) {
        let g = current.and_then(|c| self.g.get(&c).copied());
        let f = current.and_then(|c| self.f.get(&c).copied());
        self.recorder.record(
            current,
            &self.closed,
            self.frontier.open_cells(),
            &self.parent,
            g,
            f,
        );
    }

    fn settle(&mut self, cell: Cell) {
        self.closed.push(cell);
        self.closed_set.insert(cell);
        self.record(Some(cell));
    }

    /// Relax every free, unsettled neighbor of `current`.
    ///
    /// `current` was popped live, so it was pushed with a g-cost first.
    fn expand(&mut self, grid: &Grid, current: Cell) {
        let g_current = self.g.get(&current).copied();
        debug_assert!(g_current.is_some(), "settled {current} has no g-cost");
        let Some(g_current) = g_current else {
            return;
        };
        for neighbor in grid.neighbors(current) {
            if self.closed_set.contains(&neighbor) {
                continue;
            }
            let candidate = g_current + 1;
            if self.g.get(&neighbor).is_some_and(|&known| candidate >= known) {
                continue;
            }
            let f = candidate + neighbor.manhattan(self.goal);
            self.parent.insert(neighbor, current);
            self.g.insert(neighbor, candidate);
            self.f.insert(neighbor, f);
            let key = self.frontier.push(neighbor, f);
            tracing::trace!(
                cell = %neighbor,
                g = candidate,
                f,
                sequence = key.sequence,
                "frontier push"
            );
        }
    }

    fn finish(
        self,
        termination: TerminationReason,
        path: Vec<Cell>,
        start: Cell,
        policy: &SearchPolicy,
    ) -> SearchResult {
        SearchResult {
            start,
            goal: self.goal,
            trace: self.recorder.finish(),
            path,
            termination,
            stats: SearchStats {
                pops: self.pops,
                stale_discarded: self.frontier.stale_discarded(),
                frontier_high_water: self.frontier.high_water(),
            },
            policy: policy.clone(),
        }
    }
}

/// Run A* on `grid` with [`SearchPolicy::default`].
///
/// # Errors
///
/// Same as [`run_with_policy`].
pub fn run(grid: &Grid) -> Result<SearchResult, SearchError> {
    run_with_policy(grid, &SearchPolicy::default())
}

/// Run A* from the grid's start to its goal, recording one frame per
/// settled cell.
///
/// Unit edge cost, 4-connectivity, Manhattan heuristic. The frontier pops
/// the smallest `(f_cost, insertion sequence)`, so the expansion order (and
/// therefore the trace) is fully determined by the grid.
///
/// Unreachable goals and spent step budgets are not errors: they return
/// `Ok` with an empty path and a [`TerminationReason`] saying why.
///
/// # Errors
///
/// Pre-flight only, before any frame is recorded:
/// - [`SearchError::UnsupportedPolicy`] if the policy fails validation.
/// - [`SearchError::Grid`] if the endpoints are missing, out of bounds,
///   equal, or on a wall.
pub fn run_with_policy(grid: &Grid, policy: &SearchPolicy) -> Result<SearchResult, SearchError> {
    policy.validate()?;
    let (start, goal) = grid.endpoints()?;

    tracing::debug!(
        size = grid.size(),
        walls = grid.wall_count(),
        %start,
        %goal,
        max_steps = policy.max_steps,
        "search run started"
    );

    let mut ctx = SearchContext::new(grid, start, goal);

    let termination = loop {
        if ctx.frontier.is_empty() {
            break TerminationReason::FrontierExhausted;
        }
        if ctx.pops >= policy.max_steps {
            tracing::warn!(
                limit = policy.max_steps,
                frames = ctx.recorder.len(),
                "search step limit exceeded"
            );
            break TerminationReason::StepLimitExceeded {
                limit: policy.max_steps,
            };
        }

        let Some(pop) = ctx.frontier.pop() else {
            break TerminationReason::FrontierExhausted;
        };
        ctx.pops += 1;

        let current = match pop {
            FrontierPop::Stale { .. } => continue,
            FrontierPop::Live { cell, key } => {
                tracing::trace!(cell = %cell, f = key.f_cost, sequence = key.sequence, "settle");
                cell
            }
        };

        ctx.settle(current);
        if current == goal {
            break TerminationReason::GoalReached;
        }
        ctx.expand(grid, current);
    };

    let path = match termination {
        TerminationReason::GoalReached => reconstruct_path(&ctx.parent, start, goal),
        _ => Vec::new(),
    };

    let result = ctx.finish(termination, path, start, policy);
    tracing::debug!(
        termination = result.termination.as_str(),
        frames = result.trace.len(),
        path_len = result.path.len(),
        pops = result.stats.pops,
        stale = result.stats.stale_discarded,
        "search run finished"
    );
    Ok(result)
}
