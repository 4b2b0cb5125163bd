//! Codec trait and implementations.
//!
//! A codec converts between message types and raw bytes. The rest of the
//! stack only ever talks to the [`Codec`] trait, so the wire encoding
//! can be swapped (JSON today, a binary format later) without touching
//! the intake, matchmaking, or session code.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes message types to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` because a single codec instance is shared
/// across every connection task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into one wire frame's worth of bytes.
    ///
    /// # Errors
    /// [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes one frame's bytes back into a value.
    ///
    /// # Errors
    /// [`ProtocolError::Decode`] if the bytes are malformed, truncated,
    /// or do not match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Human-readable frames make the protocol easy to exercise by hand and
/// from browser clients. Behind the `json` feature (on by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
