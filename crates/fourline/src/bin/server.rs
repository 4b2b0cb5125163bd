//! Runnable Fourline match server with default settings.
//!
//! Listens on `0.0.0.0:8000`. Log verbosity follows `RUST_LOG`
//! (default `info`).

use fourline::ServerBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let server = ServerBuilder::new().bind("0.0.0.0:8000").build().await?;
    tracing::info!(addr = %server.local_addr()?, "listening");
    server.run().await?;
    Ok(())
}
