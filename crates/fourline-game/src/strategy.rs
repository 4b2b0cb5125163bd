//! Move-selection strategies for the computer seat.

use rand::Rng;

use crate::Board;

/// A pluggable move selector for a computer-controlled seat.
///
/// The session engine calls [`choose`](MoveStrategy::choose) once per
/// computer turn, synchronously, with the current board. The returned
/// column should be legal (in range and not full) for a board that still
/// has room; the engine re-invokes the strategy if it is not.
pub trait MoveStrategy: Send + Sync + 'static {
    /// Picks a column to drop into. The board is never full when this
    /// is called.
    fn choose(&mut self, board: &Board) -> usize;
}

// Closures make handy strategies in tests ("always play the lowest
// legal column", scripted sequences, and so on).
impl<F> MoveStrategy for F
where
    F: FnMut(&Board) -> usize + Send + Sync + 'static,
{
    fn choose(&mut self, board: &Board) -> usize {
        self(board)
    }
}

/// Uniform-random legal-column pick.
///
/// Rejection-samples columns until one is in range and not full. With at
/// least one open column this terminates with probability 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStrategy;

impl MoveStrategy for RandomStrategy {
    fn choose(&mut self, board: &Board) -> usize {
        let mut rng = rand::rng();
        loop {
            let col = rng.random_range(0..board.dims().cols);
            if !board.is_column_full(col) {
                return col;
            }
        }
    }
}
