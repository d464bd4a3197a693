//! Editing session: the grid an editor mutates plus the last run over it.
//!
//! A session owns one [`Grid`], a seeded RNG for random walls, and at most
//! one cached [`SearchResult`] with its [`PlaybackCursor`]. Any mutation that
//! changes the grid drops the cached result and cursor, so playback can
//! never show frames that disagree with the grid on screen.

use rand::rngs::StdRng;
use rand::SeedableRng;

use pathtrace_kernel::grid::{Cell, Grid, GridError};
use pathtrace_search::{run_with_policy, Frame, SearchError, SearchPolicy, SearchResult, TraceError};

use crate::playback::PlaybackCursor;
use crate::view::GridView;

/// Side length of a fresh editor grid.
pub const DEFAULT_GRID_SIZE: usize = 50;

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 0;

#[derive(Debug)]
pub struct EditSession {
    grid: Grid,
    policy: SearchPolicy,
    rng: StdRng,
    result: Option<SearchResult>,
    cursor: Option<PlaybackCursor>,
}

impl EditSession {
    /// An empty `size × size` session seeded with [`DEFAULT_SEED`].
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSize`] if `size` is zero.
    pub fn new(size: usize) -> Result<Self, GridError> {
        Self::with_seed(size, DEFAULT_SEED)
    }

    /// An empty session whose random-wall stream is fixed by `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSize`] if `size` is zero.
    pub fn with_seed(size: usize, seed: u64) -> Result<Self, GridError> {
        Ok(Self::from_grid(Grid::new(size)?, seed))
    }

    /// Wrap an existing grid.
    #[must_use]
    pub fn from_grid(grid: Grid, seed: u64) -> Self {
        Self {
            grid,
            policy: SearchPolicy::default(),
            rng: StdRng::seed_from_u64(seed),
            result: None,
            cursor: None,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Replace the policy used by later runs. Drops the cached result.
    pub fn set_policy(&mut self, policy: SearchPolicy) {
        if policy != self.policy {
            self.policy = policy;
            self.invalidate("policy");
        }
    }

    // -- grid mutation ------------------------------------------------------

    /// # Errors
    ///
    /// Same as [`Grid::set_wall`].
    pub fn set_wall(&mut self, cell: Cell, wall: bool) -> Result<bool, GridError> {
        let changed = self.grid.set_wall(cell, wall)?;
        if changed {
            self.invalidate("set_wall");
        }
        Ok(changed)
    }

    /// # Errors
    ///
    /// Same as [`Grid::toggle_wall`].
    pub fn toggle_wall(&mut self, cell: Cell) -> Result<bool, GridError> {
        let wall = self.grid.toggle_wall(cell)?;
        self.invalidate("toggle_wall");
        Ok(wall)
    }

    /// # Errors
    ///
    /// Same as [`Grid::bulk_set`]; nothing changes on error.
    pub fn bulk_set(&mut self, cells: &[Cell], wall: bool) -> Result<usize, GridError> {
        let changed = self.grid.bulk_set(cells, wall)?;
        if changed > 0 {
            self.invalidate("bulk_set");
        }
        Ok(changed)
    }

    /// Re-roll walls from the session RNG.
    ///
    /// # Errors
    ///
    /// Same as [`Grid::randomize`].
    pub fn randomize(&mut self, density: f64) -> Result<(), GridError> {
        self.grid.randomize(density, &mut self.rng)?;
        self.invalidate("randomize");
        Ok(())
    }

    /// # Errors
    ///
    /// Same as [`Grid::set_start`].
    pub fn set_start(&mut self, cell: Cell) -> Result<(), GridError> {
        if self.grid.start() == Some(cell) {
            return Ok(());
        }
        self.grid.set_start(cell)?;
        self.invalidate("set_start");
        Ok(())
    }

    /// # Errors
    ///
    /// Same as [`Grid::set_goal`].
    pub fn set_goal(&mut self, cell: Cell) -> Result<(), GridError> {
        if self.grid.goal() == Some(cell) {
            return Ok(());
        }
        self.grid.set_goal(cell)?;
        self.invalidate("set_goal");
        Ok(())
    }

    /// Free every cell and unset both endpoints.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.invalidate("clear");
    }

    fn invalidate(&mut self, cause: &'static str) {
        if self.result.take().is_some() {
            tracing::debug!(cause, "cached search result dropped");
        }
        self.cursor = None;
    }

    // -- search -------------------------------------------------------------

    /// Run the search over the current grid and cache the result, with the
    /// playback cursor at frame 0.
    ///
    /// On error the previous result (if any) is left untouched.
    ///
    /// # Errors
    ///
    /// Same as [`run_with_policy`].
    pub fn run(&mut self) -> Result<&SearchResult, SearchError> {
        let result = run_with_policy(&self.grid, &self.policy)?;
        tracing::debug!(
            frames = result.frames().len(),
            path_len = result.path.len(),
            termination = result.termination.as_str(),
            "session run cached"
        );
        self.cursor = Some(PlaybackCursor::new(result.frames().len()));
        Ok(&*self.result.insert(result))
    }

    #[must_use]
    pub fn result(&self) -> Option<&SearchResult> {
        self.result.as_ref()
    }

    /// Random-access frame read from the cached result.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::OutOfRange`] if `index` is past the end, or if
    /// there is no cached result (reported with `len: 0`).
    pub fn frame_at(&self, index: usize) -> Result<&Frame, TraceError> {
        match &self.result {
            Some(result) => result.frame_at(index),
            None => Err(TraceError::OutOfRange { index, len: 0 }),
        }
    }

    /// Final path of the cached result; empty without one.
    #[must_use]
    pub fn path(&self) -> &[Cell] {
        match &self.result {
            Some(result) => result.path(),
            None => &[],
        }
    }

    // -- playback -----------------------------------------------------------

    #[must_use]
    pub fn cursor(&self) -> Option<&PlaybackCursor> {
        self.cursor.as_ref()
    }

    /// Mutable cursor for `next`/`prev`/`goto`; `None` until a run.
    pub fn cursor_mut(&mut self) -> Option<&mut PlaybackCursor> {
        self.cursor.as_mut()
    }

    /// The frame under the cursor.
    #[must_use]
    pub fn current_frame(&self) -> Option<&Frame> {
        let index = self.cursor.as_ref()?.index();
        self.result.as_ref()?.frame_at(index).ok()
    }

    /// Presentation payload for the current grid and cursor position.
    #[must_use]
    pub fn view(&self) -> GridView {
        GridView::build(&self.grid, self.result.as_ref(), self.cursor.as_ref())
    }
}
