//! Cell coordinates.

/// A cell address on a square grid.
///
/// Ordering is row-major (`row`, then `col`), so iterating a
/// `BTreeSet<Cell>` visits cells in ascending linear-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two cells.
    ///
    /// This is the engine's heuristic: under unit-cost 4-connectivity it never
    /// overestimates and changes by at most one across an edge.
    #[must_use]
    pub fn manhattan(self, other: Cell) -> u64 {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as u64
    }

    /// Whether two cells share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Which endpoint of a search an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Goal => f.write_str("goal"),
        }
    }
}
