//! Matchmaking queues and their dispatcher tasks.
//!
//! Two independent FIFO queues, one per match kind, each drained by its
//! own long-lived task. A dispatcher blocks on `recv` until the
//! channel hands it enough participants to form a match, then spawns a
//! session task and immediately goes back to receiving — it never
//! awaits the session it started, so a long match cannot stall match
//! formation behind it.
//!
//! Pairing order is channel order, which is enqueue order: the two
//! oldest waiters in the versus queue always form the next match.

use std::sync::Arc;

use tokio::sync::mpsc;

use fourline_game::MoveStrategy;
use fourline_protocol::Codec;
use fourline_transport::{Connection, WebSocketConnection};

use crate::session::{MatchSettings, Session};

/// Produces a fresh strategy per player-vs-computer session, so
/// strategies may carry per-match state without sharing it.
pub type StrategyFactory = Arc<dyn Fn() -> Box<dyn MoveStrategy> + Send + Sync>;

/// A connection that finished intake and is waiting for a match.
pub struct MatchRequest {
    pub conn: WebSocketConnection,
}

/// Sender halves of the two queues, cloned into every intake task.
#[derive(Clone)]
pub struct QueueHandles {
    pub pvp: mpsc::UnboundedSender<MatchRequest>,
    pub pvc: mpsc::UnboundedSender<MatchRequest>,
}

/// Creates both queues and spawns their dispatcher tasks.
///
/// The dispatchers run until every sender handle is dropped, then exit
/// on their own.
pub fn spawn_dispatchers<K>(
    codec: K,
    settings: MatchSettings,
    strategy: StrategyFactory,
) -> QueueHandles
where
    K: Codec + Clone,
{
    let (pvp_tx, pvp_rx) = mpsc::unbounded_channel();
    let (pvc_tx, pvc_rx) = mpsc::unbounded_channel();

    tokio::spawn(run_pvp_dispatcher(pvp_rx, codec.clone(), settings));
    tokio::spawn(run_pvc_dispatcher(pvc_rx, codec, settings, strategy));

    QueueHandles {
        pvp: pvp_tx,
        pvc: pvc_tx,
    }
}

/// Drains the versus queue two at a time.
async fn run_pvp_dispatcher<K>(
    mut queue: mpsc::UnboundedReceiver<MatchRequest>,
    codec: K,
    settings: MatchSettings,
) where
    K: Codec + Clone,
{
    tracing::debug!("versus dispatcher running");
    while let Some(first) = queue.recv().await {
        // The head waiter holds its slot until a peer arrives, however
        // long that takes.
        let Some(second) = queue.recv().await else {
            break;
        };
        tracing::info!(
            first = %first.conn.id(),
            second = %second.conn.id(),
            "versus match formed"
        );
        let session = Session::pvp(first.conn, second.conn, codec.clone(), settings);
        tokio::spawn(async move {
            if let Err(e) = session.run().await {
                tracing::warn!(error = %e, "versus session ended early");
            }
        });
    }
    tracing::debug!("versus dispatcher stopped");
}

/// Drains the solo queue one at a time, pairing each waiter with a
/// freshly built strategy.
async fn run_pvc_dispatcher<K>(
    mut queue: mpsc::UnboundedReceiver<MatchRequest>,
    codec: K,
    settings: MatchSettings,
    strategy: StrategyFactory,
) where
    K: Codec + Clone,
{
    tracing::debug!("solo dispatcher running");
    while let Some(request) = queue.recv().await {
        tracing::info!(conn = %request.conn.id(), "solo match formed");
        let session = Session::pvc(request.conn, strategy(), codec.clone(), settings);
        tokio::spawn(async move {
            if let Err(e) = session.run().await {
                tracing::warn!(error = %e, "solo session ended early");
            }
        });
    }
    tracing::debug!("solo dispatcher stopped");
}
