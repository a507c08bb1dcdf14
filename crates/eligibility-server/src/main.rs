// ============================================================================
// eligibility-server — HTTP front end for wallet eligibility checks
// ============================================================================
// POST /check-eligibility  { "secret": "<seed phrase or base58 key>" }
// GET  /health
//
// Configuration (env / .env):
//   RPC_URL               Solana RPC endpoint (default: mainnet-beta)
//   BIND_ADDR             listen address (default: 0.0.0.0:3000)
//   REQUEST_TIMEOUT_SECS  per-request timeout (default: 60)
//   ELIGIBILITY_DB_PATH   redb file (default: ~/.eligibility/checks.redb)
// ============================================================================

mod routes;

use anyhow::{Context, Result};
use eligibility_core::{EligibilityChecker, EligibilityDb, SolanaLedger};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub checker: Arc<EligibilityChecker>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file, if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("eligibility_server=info".parse().unwrap())
                .add_directive("eligibility_core=info".parse().unwrap()),
        )
        .init();

    let rpc_url = std::env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let request_timeout = std::env::var("REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

    info!("Starting wallet eligibility server");

    // Process-scoped collaborators: one ledger connection, one database
    // handle, both shared by reference across concurrent requests.
    let ledger = Arc::new(SolanaLedger::new(&rpc_url));
    let db = Arc::new(
        EligibilityDb::open(None).context("failed to open eligibility database")?,
    );
    let checker = Arc::new(EligibilityChecker::new(ledger, db));

    let app = routes::router(
        AppState { checker },
        Duration::from_secs(request_timeout),
    );

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Shutdown signal received");
}
