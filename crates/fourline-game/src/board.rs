//! The board: a fixed-size grid with gravity-drop placement and
//! landing-cell win detection.

use crate::{MoveError, SeatId};

/// Board dimensions, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardDims {
    pub rows: usize,
    pub cols: usize,
}

impl BoardDims {
    /// Total cell capacity.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

/// The classic configuration: 6 rows by 7 columns.
impl Default for BoardDims {
    fn default() -> Self {
        Self { rows: 6, cols: 7 }
    }
}

/// A Connect-Four grid. Row 0 is the top row; pieces fall toward the
/// highest row index.
///
/// Invariants:
/// - Gravity: a cell is occupied only if every cell below it in the same
///   column is occupied.
/// - `remaining` equals the number of empty cells and is decremented
///   exactly once per successful placement.
///
/// A board is created fresh per session, mutated only through
/// [`place`](Board::place), and dropped with the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    dims: BoardDims,
    cells: Vec<Vec<Option<SeatId>>>,
    remaining: usize,
}

impl Board {
    /// Creates an empty board with the given dimensions.
    pub fn new(dims: BoardDims) -> Self {
        Self {
            dims,
            cells: vec![vec![None; dims.cols]; dims.rows],
            remaining: dims.cell_count(),
        }
    }

    /// The dimensions this board was constructed with.
    pub fn dims(&self) -> BoardDims {
        self.dims
    }

    /// Number of empty cells left.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// `true` once every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.remaining == 0
    }

    /// The occupant of `(row, col)`, or `None` if the cell is empty or
    /// the coordinates are out of range. An out-of-range probe never
    /// reads cell contents.
    pub fn get(&self, row: usize, col: usize) -> Option<SeatId> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    /// `true` if the topmost cell of `col` is occupied (or `col` is out
    /// of range — a full column and a nonexistent one both refuse a
    /// piece).
    pub fn is_column_full(&self, col: usize) -> bool {
        col >= self.dims.cols || self.cells[0][col].is_some()
    }

    /// Drops a piece for `seat` into `col`.
    ///
    /// The piece lands on the first empty cell scanning upward from the
    /// bottom row. Returns the landing row. On failure the board is
    /// unchanged.
    ///
    /// # Errors
    /// [`MoveError::ColumnOutOfRange`] when `col >= cols`;
    /// [`MoveError::ColumnFull`] when the column has no empty cell.
    pub fn place(&mut self, col: usize, seat: SeatId) -> Result<usize, MoveError> {
        if col >= self.dims.cols {
            return Err(MoveError::ColumnOutOfRange(col as i64));
        }
        if self.cells[0][col].is_some() {
            return Err(MoveError::ColumnFull(col));
        }
        for row in (0..self.dims.rows).rev() {
            if self.cells[row][col].is_none() {
                self.cells[row][col] = Some(seat);
                self.remaining -= 1;
                return Ok(row);
            }
        }
        // The top cell was empty, so the scan always finds a landing row.
        unreachable!("column {col} had an empty top cell but no landing row");
    }

    /// Whether the piece at `(row, col)` completes four in a row.
    ///
    /// Evaluated at the landing cell after every placement. Three axis
    /// families are checked independently and OR-ed together:
    ///
    /// - vertical and horizontal: the counts of both directional walks
    ///   are summed, with the seed cell counted once;
    /// - diagonal: each of the two diagonal families (`/` and `\`) is
    ///   summed the same way, but the axis result is the *maximum* of
    ///   the two families, not their sum.
    ///
    /// The max-of-families diagonal is deliberate; see the design notes
    /// before changing it.
    ///
    /// Runs are counted by the seed cell's occupant, not the acting
    /// seat. An empty or out-of-range seed never wins.
    pub fn has_win_at(&self, row: usize, col: usize) -> bool {
        let Some(seat) = self.get(row, col) else {
            return false;
        };
        let (r, c) = (row as i64, col as i64);

        // Each pair: walk from the seed in one direction, then from the
        // seed's neighbor in the other, so the seed is counted once.
        let vertical =
            self.run(r, c, 1, 0, seat) + self.run(r - 1, c, -1, 0, seat);
        let horizontal =
            self.run(r, c, 0, 1, seat) + self.run(r, c - 1, 0, -1, seat);
        let up_diag =
            self.run(r, c, -1, 1, seat) + self.run(r + 1, c - 1, 1, -1, seat);
        let down_diag =
            self.run(r, c, -1, -1, seat) + self.run(r + 1, c + 1, 1, 1, seat);

        vertical >= 4 || horizontal >= 4 || up_diag.max(down_diag) >= 4
    }

    /// Counts consecutive cells occupied by `seat` starting at
    /// `(row, col)` inclusive, stepping by `(dr, dc)`, stopping at the
    /// first mismatch or board edge.
    fn run(&self, mut row: i64, mut col: i64, dr: i64, dc: i64, seat: SeatId) -> u32 {
        let mut count = 0;
        while self.occupied_by(row, col, seat) {
            count += 1;
            row += dr;
            col += dc;
        }
        count
    }

    fn occupied_by(&self, row: i64, col: i64, seat: SeatId) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        self.get(row as usize, col as usize) == Some(seat)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardDims::default())
    }
}
