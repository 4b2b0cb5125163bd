//! Error type for board placement.

/// Why a placement attempt was rejected.
///
/// A rejected placement has no side effect on the board and does not
/// consume the acting seat's turn — the session re-prompts the same seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The requested column is outside `[0, cols)`.
    #[error("column {0} is out of range")]
    ColumnOutOfRange(i64),

    /// The topmost cell of the requested column is already occupied.
    #[error("column {0} is full")]
    ColumnFull(usize),
}
