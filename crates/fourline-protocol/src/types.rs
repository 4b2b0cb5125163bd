//! Wire message types for the Fourline match protocol.
//!
//! The full exchange for one match, in order:
//!
//! 1. Client → Server: [`ClientMessage::RequestMatch`] with a
//!    [`MatchKind`]. Anything else earns a [`StatusCode::BadInput`] and
//!    the client must resend.
//! 2. Server → Client (each human seat): [`ServerMessage::Seat`].
//! 3. Repeating turn cycle, sent only to the seat whose turn it is:
//!    [`StatusCode::Continue`], then a [`BoardSnapshot`]; the client
//!    answers with [`ClientMessage::Drop`]; the server acknowledges with
//!    [`StatusCode::GoodInput`] or [`StatusCode::BadInput`] (on
//!    `BadInput`, resend a column — the turn is retained).
//! 4. Terminal broadcast to all humans: `Player0Won`, `Player1Won`, or
//!    `Draw`, followed by the final snapshot.

use serde::{Deserialize, Serialize};

use fourline_game::{Board, SeatId, SessionResult};

// ---------------------------------------------------------------------------
// Match kind
// ---------------------------------------------------------------------------

/// The kind of match a connecting client is asking for.
///
/// The two kinds feed two fully independent matchmaking queues; a
/// request only ever competes with requests of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    /// Two humans, paired in arrival order.
    PlayerVsPlayer,
    /// One human against the server's move strategy.
    PlayerVsComputer,
}

// ---------------------------------------------------------------------------
// Status codes
// ---------------------------------------------------------------------------

/// The fixed status and acknowledgment code space of the protocol.
///
/// All six codes are distinct for the lifetime of the protocol; a client
/// can dispatch on the code alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    /// Terminal: seat 0 completed four in a row.
    Player0Won,
    /// Terminal: seat 1 completed four in a row.
    Player1Won,
    /// Terminal: the board filled with no winner.
    Draw,
    /// It is the receiving seat's turn; a board snapshot follows.
    Continue,
    /// The last column (or match request) was accepted.
    GoodInput,
    /// The last input was rejected; resend.
    BadInput,
}

impl From<SessionResult> for StatusCode {
    fn from(result: SessionResult) -> Self {
        match result {
            SessionResult::Win(SeatId(0)) => StatusCode::Player0Won,
            SessionResult::Win(_) => StatusCode::Player1Won,
            SessionResult::Draw => StatusCode::Draw,
        }
    }
}

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// Messages a client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// "Pair me into a match of this kind." First message on every
    /// connection; repeated until the server accepts it.
    RequestMatch { kind: MatchKind },

    /// "Drop my piece into this column." Signed so that out-of-range
    /// values (including negatives) survive the wire intact and can be
    /// rejected by the server rather than the decoder.
    Drop { column: i64 },
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// Messages the server sends to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// A status or acknowledgment code.
    Status { code: StatusCode },

    /// The seat this client occupies for the match (`0` or `1`).
    Seat { seat: SeatId },

    /// The full board, sent before each of the client's turns and after
    /// the terminal status.
    Board { board: BoardSnapshot },
}

// ---------------------------------------------------------------------------
// Board snapshot
// ---------------------------------------------------------------------------

/// An exact, self-contained copy of the board: dimensions plus the
/// occupant of every cell.
///
/// Built from the live [`Board`] at the moment of sending. Row 0 is the
/// top row; cell values are the occupying seat id or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Vec<Option<SeatId>>>,
}

impl BoardSnapshot {
    /// The occupant of `(row, col)`, or `None` for empty or
    /// out-of-range cells.
    pub fn get(&self, row: usize, col: usize) -> Option<SeatId> {
        self.cells.get(row)?.get(col).copied().flatten()
    }
}

impl From<&Board> for BoardSnapshot {
    fn from(board: &Board) -> Self {
        let dims = board.dims();
        let cells = (0..dims.rows)
            .map(|row| (0..dims.cols).map(|col| board.get(row, col)).collect())
            .collect();
        Self {
            rows: dims.rows,
            cols: dims.cols,
            cells,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
