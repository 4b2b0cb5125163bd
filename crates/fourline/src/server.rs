//! `Server` builder and accept loop.
//!
//! This is the entry point for running a Fourline match server. It ties
//! together all the layers: transport → protocol → matchmaking → session.

use std::sync::Arc;
use std::time::Duration;

use fourline_game::{BoardDims, MoveStrategy, RandomStrategy};
use fourline_protocol::{Codec, JsonCodec};
use fourline_transport::{Transport, WebSocketTransport};

use crate::FourlineError;
use crate::intake::handle_intake;
use crate::matchmaking::{self, QueueHandles, StrategyFactory};
use crate::session::MatchSettings;

/// Shared server state passed to each intake task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The queue
/// senders are the only mutable coupling between tasks.
pub(crate) struct ServerState<K: Codec> {
    pub(crate) codec: K,
    pub(crate) queues: QueueHandles,
}

/// Builder for configuring and starting a Fourline server.
///
/// # Example
///
/// ```rust,ignore
/// use fourline::prelude::*;
///
/// let server = Server::builder()
///     .bind("0.0.0.0:8000")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct ServerBuilder {
    bind_addr: String,
    dims: BoardDims,
    move_timeout: Option<Duration>,
    strategy: StrategyFactory,
}

impl ServerBuilder {
    /// Creates a new builder with default settings: a six-by-seven
    /// board, no move deadline, and a uniformly random computer
    /// opponent.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            dims: BoardDims::default(),
            move_timeout: None,
            strategy: Arc::new(|| Box::new(RandomStrategy) as Box<dyn MoveStrategy>),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the board dimensions used for every match.
    pub fn board_dims(mut self, dims: BoardDims) -> Self {
        self.dims = dims;
        self
    }

    /// Sets a per-move deadline for human seats. A player who lets it
    /// expire forfeits the match as if they had disconnected. Unset by
    /// default: players may deliberate forever.
    pub fn move_timeout(mut self, limit: Duration) -> Self {
        self.move_timeout = Some(limit);
        self
    }

    /// Sets the factory that builds the computer opponent for each
    /// player-vs-computer match.
    pub fn strategy(mut self, factory: StrategyFactory) -> Self {
        self.strategy = factory;
        self
    }

    /// Binds the listener and builds the server.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport` as defaults.
    ///
    /// # Errors
    /// Fails if the bind address is unavailable.
    pub async fn build(self) -> Result<Server<JsonCodec>, FourlineError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let settings = MatchSettings {
            dims: self.dims,
            move_timeout: self.move_timeout,
        };
        let queues = matchmaking::spawn_dispatchers(JsonCodec, settings, self.strategy);

        let state = Arc::new(ServerState {
            codec: JsonCodec,
            queues,
        });

        Ok(Server { transport, state })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Fourline match server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct Server<K: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<K>>,
}

impl<K> Server<K>
where
    K: Codec + Clone,
{
    /// Creates a new builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns an intake task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), FourlineError> {
        tracing::info!("Fourline server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_intake(conn, &state.codec, &state.queues).await
                        {
                            tracing::debug!(error = %e, "intake ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
