//! Seats: the two fixed participant slots of a match.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one of the two participant slots in a match.
///
/// Always `0` or `1`, stable for the session's lifetime, and used
/// directly as the occupant value in board cells — the seat that placed
/// a piece is exactly the value stored in the cell.
///
/// `#[serde(transparent)]` so a `SeatId(1)` travels on the wire as the
/// plain number `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(pub u8);

impl SeatId {
    /// The other seat of the match.
    pub fn opponent(self) -> SeatId {
        SeatId(1 - self.0)
    }

    /// Index into per-seat arrays.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat-{}", self.0)
    }
}

/// Whether a seat is driven by a remote human or a local strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatKind {
    Human,
    Computer,
}

/// The two seats of a match and how each is controlled.
///
/// Only two configurations exist: both seats human (PvP) or seat 0 human
/// and seat 1 computer (PvC). Seat 0 always has a live connection behind
/// it; seat 1 is either a connection or a move strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participants {
    kinds: [SeatKind; 2],
}

impl Participants {
    /// Two human seats.
    pub fn pvp() -> Self {
        Self {
            kinds: [SeatKind::Human, SeatKind::Human],
        }
    }

    /// Seat 0 human, seat 1 computer.
    pub fn pvc() -> Self {
        Self {
            kinds: [SeatKind::Human, SeatKind::Computer],
        }
    }

    /// How the given seat is controlled.
    pub fn kind(&self, seat: SeatId) -> SeatKind {
        self.kinds[seat.index()]
    }

    /// `true` when both seats are human.
    pub fn is_pvp(&self) -> bool {
        self.kinds[1] == SeatKind::Human
    }
}
