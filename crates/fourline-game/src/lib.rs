//! Game model for Fourline.
//!
//! This crate is the bottom layer of the stack: it knows nothing about
//! connections, queues, or serial formats. It owns:
//!
//! - **Board** ([`Board`], [`BoardDims`], [`MoveError`]) — the gravity-drop
//!   grid, capacity tracking, and landing-cell win detection.
//! - **Seats** ([`SeatId`], [`Participants`], [`SeatKind`]) — the two fixed
//!   participant slots of a match and whether each is human or
//!   computer-controlled.
//! - **Strategies** ([`MoveStrategy`], [`RandomStrategy`]) — the pluggable
//!   move-selection capability behind the computer seat.
//!
//! Everything here is synchronous and deterministic (except the random
//! strategy), which is what makes the session engine above it testable.

mod board;
mod error;
mod seat;
mod strategy;

pub use board::{Board, BoardDims};
pub use error::MoveError;
pub use seat::{Participants, SeatId, SeatKind};
pub use strategy::{MoveStrategy, RandomStrategy};

use serde::{Deserialize, Serialize};

/// The terminal classification of a finished match.
///
/// Computed exactly once per session; after it exists the session accepts
/// no further moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionResult {
    /// The given seat completed four in a row.
    Win(SeatId),
    /// The board filled up with no four in a row.
    Draw,
}
