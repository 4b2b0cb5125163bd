//! Unified error type for the match server.

use fourline_game::SeatId;
use fourline_protocol::ProtocolError;
use fourline_transport::TransportError;

/// Top-level error for server, intake, and session tasks.
///
/// Connection-level failures are fatal only to the task that owns the
/// connection: an intake task stops servicing, a session task ends its
/// match. Nothing here ever tears down the server.
#[derive(Debug, thiserror::Error)]
pub enum FourlineError {
    /// A transport-level error (bind, accept).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The peer closed its connection cleanly.
    #[error("peer disconnected")]
    Disconnected,

    /// Reading from or writing to the peer failed mid-exchange.
    #[error("connection lost: {0}")]
    ConnectionLost(Box<dyn std::error::Error + Send + Sync>),

    /// A seat exceeded the configured per-move deadline and forfeits,
    /// ending the session the same way a disconnect would.
    #[error("{0} forfeited the match: move deadline expired")]
    TurnForfeited(SeatId),

    /// The matchmaking dispatchers are gone; no new match can form.
    #[error("matchmaking queues are closed")]
    MatchmakingClosed,
}

impl FourlineError {
    /// Wraps a connection-level send/recv failure.
    pub(crate) fn connection_lost<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FourlineError::ConnectionLost(Box::new(err))
    }
}
