//! # Fourline
//!
//! A turn-based Connect-Four match server. Clients connect over a
//! persistent message-framed stream, request a match kind, wait in a
//! FIFO queue, and play a strictly alternating-turn match until it
//! concludes with a win or a draw.
//!
//! The layers, bottom-up:
//!
//! ```text
//! fourline-game      board, win detection, seats, move strategies
//! fourline-transport accept loop + per-player framed connections
//! fourline-protocol  tagged wire messages + codec
//! fourline (this)    intake → matchmaking queues → session engine
//! ```
//!
//! Control flow: the accept loop spawns an intake task per connection;
//! intake reads the requested [`MatchKind`](fourline_protocol::MatchKind)
//! and pushes the connection into one of two queues; two dispatcher
//! tasks drain the queues (two connections per player-vs-player match,
//! one per player-vs-computer match) and spawn a session task per
//! match. Each session exclusively owns its board and its connections.

mod error;
mod intake;
mod matchmaking;
mod server;
mod session;

pub use error::FourlineError;
pub use matchmaking::{MatchRequest, StrategyFactory};
pub use server::{Server, ServerBuilder};
pub use session::{MatchSettings, SeatActor, Session};

/// Commonly used types for server embedders and protocol clients.
pub mod prelude {
    pub use crate::{FourlineError, MatchSettings, Server, ServerBuilder};
    pub use fourline_game::{
        Board, BoardDims, MoveStrategy, RandomStrategy, SeatId, SessionResult,
    };
    pub use fourline_protocol::{
        BoardSnapshot, ClientMessage, Codec, JsonCodec, MatchKind, ServerMessage,
        StatusCode,
    };
}
