//! Shooting gallery server
//!
//! Hosts single-player "find the real target" gallery sessions for a browser
//! client. The client renders the room and sends crosshair rays; the server
//! owns ammo, rounds and hit resolution.

pub mod app;
pub mod config;
pub mod game;
pub mod http;
pub mod util;
pub mod ws;

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

pub use crate::app::AppState;
pub use crate::config::Config;
pub use crate::http::build_router;

/// Serve the gallery on `listener` until `shutdown` resolves
pub async fn run<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    let router = build_router(state);

    info!("Server listening on {}", addr);
    info!("Health check: http://{}/health", addr);
    info!("WebSocket endpoint: ws://{}/ws", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
