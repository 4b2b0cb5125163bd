//! The session engine: one task that owns one match end-to-end.
//!
//! A session exclusively owns its board and its connections for the
//! match's lifetime. Seat 0 moves first and the seats then alternate
//! strictly — no passing, no simultaneous moves. All writes to a given
//! connection happen from this one task, so per-connection message
//! order is exactly the protocol order.
//!
//! Protocol per turn (human seats): `Continue`, a fresh board snapshot,
//! then read column selections until one is placeable — every rejected
//! column gets `BadInput` and the seat retains the turn with unlimited
//! retries. Computer seats ask their strategy and place directly, with
//! no wire traffic. After every accepted placement the landing cell is
//! checked for a win, then the board for fullness; otherwise the turn
//! passes to the other seat.
//!
//! Any read or write failure ends the session immediately. The peer —
//! if still connected — receives no disconnect notice and simply sees
//! no further traffic.

use std::time::Duration;

use fourline_game::{
    Board, BoardDims, MoveError, MoveStrategy, Participants, SeatId, SessionResult,
};
use fourline_protocol::{BoardSnapshot, ClientMessage, Codec, ServerMessage, StatusCode};
use fourline_transport::Connection;

use crate::FourlineError;

/// Settings every session of a server shares.
#[derive(Debug, Clone, Copy)]
pub struct MatchSettings {
    /// Board dimensions, fixed per session at construction.
    pub dims: BoardDims,

    /// Optional per-move deadline for human seats. `None` (the
    /// default) lets a player hold their turn forever. When set,
    /// expiry forfeits the match exactly like a disconnect.
    pub move_timeout: Option<Duration>,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            dims: BoardDims::default(),
            move_timeout: None,
        }
    }
}

/// What drives seat 1: a second human connection or a move strategy.
///
/// Dispatched once per turn by the session; neither arm knows the other
/// exists.
pub enum SeatActor<C> {
    Human(C),
    Computer(Box<dyn MoveStrategy>),
}

/// One match from seat announcement to terminal broadcast.
///
/// Seat 0 always has a live connection behind it; seat 1 is either a
/// live connection (player-vs-player) or a strategy
/// (player-vs-computer).
pub struct Session<C, K> {
    board: Board,
    participants: Participants,
    seat0: C,
    seat1: SeatActor<C>,
    codec: K,
    move_timeout: Option<Duration>,
}

impl<C, K> Session<C, K>
where
    C: Connection,
    K: Codec,
{
    /// Builds a player-vs-player session from two queued connections,
    /// seated in arrival order.
    pub fn pvp(first: C, second: C, codec: K, settings: MatchSettings) -> Self {
        Self {
            board: Board::new(settings.dims),
            participants: Participants::pvp(),
            seat0: first,
            seat1: SeatActor::Human(second),
            codec,
            move_timeout: settings.move_timeout,
        }
    }

    /// Builds a player-vs-computer session: the queued connection takes
    /// seat 0, the strategy takes seat 1.
    pub fn pvc(
        conn: C,
        strategy: Box<dyn MoveStrategy>,
        codec: K,
        settings: MatchSettings,
    ) -> Self {
        Self {
            board: Board::new(settings.dims),
            participants: Participants::pvc(),
            seat0: conn,
            seat1: SeatActor::Computer(strategy),
            codec,
            move_timeout: settings.move_timeout,
        }
    }

    /// Runs the match to completion and returns its result.
    ///
    /// # Errors
    /// Any connection failure or forfeited deadline ends the session;
    /// the error says which. The peer is not notified either way.
    pub async fn run(mut self) -> Result<SessionResult, FourlineError> {
        tracing::info!(
            seat0 = %self.seat0.id(),
            pvp = self.participants.is_pvp(),
            "session started"
        );

        // Each human learns their seat before any turn begins. The
        // computer seat has nobody to tell.
        send(&self.codec, &self.seat0, &ServerMessage::Seat { seat: SeatId(0) }).await?;
        if let SeatActor::Human(conn) = &self.seat1 {
            send(&self.codec, conn, &ServerMessage::Seat { seat: SeatId(1) }).await?;
        }

        let result = loop {
            let (row, col) = human_turn(
                &self.codec,
                &self.seat0,
                &mut self.board,
                SeatId(0),
                self.move_timeout,
            )
            .await?;
            if self.board.has_win_at(row, col) {
                break SessionResult::Win(SeatId(0));
            }
            if self.board.is_full() {
                break SessionResult::Draw;
            }

            let (row, col) = match &mut self.seat1 {
                SeatActor::Human(conn) => {
                    human_turn(
                        &self.codec,
                        conn,
                        &mut self.board,
                        SeatId(1),
                        self.move_timeout,
                    )
                    .await?
                }
                SeatActor::Computer(strategy) => {
                    computer_turn(strategy.as_mut(), &mut self.board)
                }
            };
            if self.board.has_win_at(row, col) {
                break SessionResult::Win(SeatId(1));
            }
            if self.board.is_full() {
                break SessionResult::Draw;
            }
        };

        self.broadcast_result(result).await?;
        tracing::info!(?result, "session finished");
        Ok(result)
    }

    /// Sends the terminal status code and the final board to every
    /// connected human. After this the session is done; no further
    /// reads are attempted on either connection.
    async fn broadcast_result(&self, result: SessionResult) -> Result<(), FourlineError> {
        let status = ServerMessage::Status {
            code: StatusCode::from(result),
        };
        let board = ServerMessage::Board {
            board: BoardSnapshot::from(&self.board),
        };
        send(&self.codec, &self.seat0, &status).await?;
        send(&self.codec, &self.seat0, &board).await?;
        if let SeatActor::Human(conn) = &self.seat1 {
            send(&self.codec, conn, &status).await?;
            send(&self.codec, conn, &board).await?;
        }
        Ok(())
    }
}

/// Runs one human turn: announce, snapshot, then read columns until one
/// places. Returns the landing cell.
async fn human_turn<C: Connection, K: Codec>(
    codec: &K,
    conn: &C,
    board: &mut Board,
    seat: SeatId,
    move_timeout: Option<Duration>,
) -> Result<(usize, usize), FourlineError> {
    send(
        codec,
        conn,
        &ServerMessage::Status {
            code: StatusCode::Continue,
        },
    )
    .await?;
    // Snapshot built fresh from the live board for every send.
    send(
        codec,
        conn,
        &ServerMessage::Board {
            board: BoardSnapshot::from(&*board),
        },
    )
    .await?;

    loop {
        let data = recv(conn, seat, move_timeout).await?;

        // Anything that isn't a decodable column selection is a
        // protocol violation: acknowledge and re-read. Never fatal, and
        // the retry count is unbounded on purpose.
        let column = match codec.decode::<ClientMessage>(&data) {
            Ok(ClientMessage::Drop { column }) => column,
            Ok(other) => {
                tracing::warn!(%seat, ?other, "unexpected message during turn");
                send_status(codec, conn, StatusCode::BadInput).await?;
                continue;
            }
            Err(e) => {
                tracing::warn!(%seat, error = %e, "undecodable frame during turn");
                send_status(codec, conn, StatusCode::BadInput).await?;
                continue;
            }
        };

        // Negative columns never fit a usize; fold them into the same
        // out-of-range rejection the board gives oversized ones.
        let attempt = match usize::try_from(column) {
            Ok(col) => board.place(col, seat),
            Err(_) => Err(MoveError::ColumnOutOfRange(column)),
        };

        match attempt {
            Ok(landing_row) => {
                send_status(codec, conn, StatusCode::GoodInput).await?;
                tracing::debug!(%seat, column, landing_row, "move accepted");
                return Ok((landing_row, column as usize));
            }
            Err(e) => {
                tracing::debug!(%seat, column, error = %e, "move rejected");
                send_status(codec, conn, StatusCode::BadInput).await?;
            }
        }
    }
}

/// Runs one computer turn. Re-invokes the strategy until it yields a
/// placeable column; a correct strategy answers legally on the first
/// ask. Returns the landing cell.
fn computer_turn(strategy: &mut dyn MoveStrategy, board: &mut Board) -> (usize, usize) {
    loop {
        let col = strategy.choose(board);
        match board.place(col, SeatId(1)) {
            Ok(row) => {
                tracing::debug!(column = col, landing_row = row, "computer moved");
                return (row, col);
            }
            Err(e) => {
                tracing::warn!(column = col, error = %e, "strategy chose an illegal column");
            }
        }
    }
}

async fn send<C: Connection, K: Codec>(
    codec: &K,
    conn: &C,
    msg: &ServerMessage,
) -> Result<(), FourlineError> {
    let bytes = codec.encode(msg)?;
    conn.send(&bytes).await.map_err(FourlineError::connection_lost)
}

async fn send_status<C: Connection, K: Codec>(
    codec: &K,
    conn: &C,
    code: StatusCode,
) -> Result<(), FourlineError> {
    send(codec, conn, &ServerMessage::Status { code }).await
}

/// Receives one frame, applying the per-move deadline if configured.
async fn recv<C: Connection>(
    conn: &C,
    seat: SeatId,
    move_timeout: Option<Duration>,
) -> Result<Vec<u8>, FourlineError> {
    let frame = match move_timeout {
        Some(limit) => tokio::time::timeout(limit, conn.recv())
            .await
            .map_err(|_| FourlineError::TurnForfeited(seat))?,
        None => conn.recv().await,
    };
    match frame {
        Ok(Some(data)) => Ok(data),
        Ok(None) => Err(FourlineError::Disconnected),
        Err(e) => Err(FourlineError::connection_lost(e)),
    }
}
