//! HTTP listener lifecycle.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::Result;
use crate::utils::shutdown_signal;

/// Bind the HTTP listener.
pub async fn bind_listener(addr: SocketAddr) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Serve `router` on `listener` until a shutdown signal arrives.
pub async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}
