//! In-memory stub of the student REST service.
//!
//! Serves the same endpoints as the real backend so the client can be
//! exercised end to end, either from the integration tests or through
//! `student-desk mock-backend`.

pub mod handlers;
pub mod routes;

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

pub use handlers::BackendState;
pub use routes::create_router;

/// Serve the stub backend on a bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: BackendState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = %listener.local_addr()?, "Stub backend listening");
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Bind `127.0.0.1` on an ephemeral port and serve in the background.
pub async fn spawn(state: BackendState) -> std::io::Result<(SocketAddr, JoinHandle<std::io::Result<()>>)> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(serve(listener, state, std::future::pending()));
    Ok((addr, handle))
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
