//! Per-connection intake: reads frames until the client names the kind
//! of match it wants, then hands the connection to the right queue.
//!
//! Intake is the only stretch of a connection's life where the server
//! reads without a session owning the socket. It ends in exactly one of
//! two ways: the connection is moved into a queue, or the client goes
//! away and the task ends without enqueuing anything.

use fourline_protocol::{ClientMessage, Codec, MatchKind, ServerMessage, StatusCode};
use fourline_transport::{Connection, WebSocketConnection};

use crate::FourlineError;
use crate::matchmaking::{MatchRequest, QueueHandles};

/// Negotiates one freshly accepted connection into a matchmaking queue.
///
/// Unrecognized or undecodable frames get `Status(BadInput)` and the
/// loop continues; there is no limit on attempts and no deadline.
///
/// # Errors
/// Fails on connection loss, on a failed write, or if the target queue's
/// dispatcher is gone (server shutting down).
pub(crate) async fn handle_intake<K: Codec>(
    conn: WebSocketConnection,
    codec: &K,
    queues: &QueueHandles,
) -> Result<(), FourlineError> {
    let conn_id = conn.id();
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(conn = %conn_id, "client left during intake");
                return Ok(());
            }
            Err(e) => return Err(FourlineError::connection_lost(e)),
        };

        let kind = match codec.decode::<ClientMessage>(&data) {
            Ok(ClientMessage::RequestMatch { kind }) => kind,
            Ok(other) => {
                tracing::debug!(conn = %conn_id, ?other, "unexpected message during intake");
                send_bad_input(&conn, codec).await?;
                continue;
            }
            Err(e) => {
                tracing::debug!(conn = %conn_id, error = %e, "undecodable intake frame");
                send_bad_input(&conn, codec).await?;
                continue;
            }
        };

        tracing::info!(conn = %conn_id, ?kind, "queued for matchmaking");
        let queue = match kind {
            MatchKind::PlayerVsPlayer => &queues.pvp,
            MatchKind::PlayerVsComputer => &queues.pvc,
        };
        queue
            .send(MatchRequest { conn })
            .map_err(|_| FourlineError::MatchmakingClosed)?;
        return Ok(());
    }
}

async fn send_bad_input<K: Codec>(
    conn: &WebSocketConnection,
    codec: &K,
) -> Result<(), FourlineError> {
    let bytes = codec.encode(&ServerMessage::Status {
        code: StatusCode::BadInput,
    })?;
    conn.send(&bytes).await.map_err(FourlineError::connection_lost)
}
