//! Storefront composer server.
//!
//! - `GET /v1/page?tenant=&path=&locale=` : composed page JSON
//! - `GET /v1/governance?tenant=`         : effective governance policy
//! - governance cache warmed before `/readyz` reports ready

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use storefront_composer::{app_state, config, router};

const CONFIG_PATH: &str = "storefront.yaml";

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error=%e, "storefront-composer failed");
        std::process::exit(1);
    }
}

async fn run() -> storefront_core::Result<()> {
    let path = std::env::var("STOREFRONT_CONFIG").unwrap_or_else(|_| CONFIG_PATH.to_string());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg.server.listen.parse().map_err(|e| {
        storefront_core::StorefrontError::BadRequest(format!("server.listen must be a valid SocketAddr: {e}"))
    })?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config=%path, "storefront-composer starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| storefront_core::StorefrontError::Internal(format!("bind failed: {e}")))?;

    let warm = state.clone();
    tokio::spawn(async move { warm.warm().await });

    axum::serve(listener, app)
        .await
        .map_err(|e| storefront_core::StorefrontError::Internal(format!("server failed: {e}")))
}
