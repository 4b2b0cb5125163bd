//! Wire protocol for Fourline.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`StatusCode`],
//!   [`BoardSnapshot`], …) — the message structures that travel on the
//!   wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to and from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding
//!   or decoding.
//!
//! Every message is a self-describing tagged object carried in its own
//! transport frame. A board snapshot is rebuilt from the live board each
//! time it is sent — there is no serialized-object cache anywhere that
//! could replay a stale board.
//!
//! The protocol layer sits between transport (raw frames) and the match
//! engine. It knows nothing about connections, queues, or sessions.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{BoardSnapshot, ClientMessage, MatchKind, ServerMessage, StatusCode};
