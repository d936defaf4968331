//! Bitmon Rewards API — Entry Point
//!
//! Initializes configuration, logging, the chain connection, the point
//! ledger, and the HTTP server. Runs until SIGINT/SIGTERM.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate (PORT / RPC_URL env overrides)
//! 2. Init tracing (JSON structured logging)
//! 3. Create Prometheus metrics registry
//! 4. Connect the Monad RPC provider (startup connectivity probe)
//! 5. Create chain adapters (BTM token reads, custodial transferer)
//! 6. Open the point ledger (memory or JSONL journal per config)
//! 7. Create usecases (ScoringService, ClaimCoordinator)
//! 8. Serve the axum router
//! 9. Wait for SIGINT/SIGTERM → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::api::{self, AppState};
use adapters::chain::provider::MonadProvider;
use adapters::chain::token::BtmToken;
use adapters::chain::transfer::BtmTransferer;
use adapters::metrics::ApiMetrics;
use adapters::persistence::{JournalLedger, MemoryLedger};
use domain::conversion::ConversionPolicy;
use ports::ledger::PointsLedger;
use usecases::{ClaimCoordinator, ScoringService};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.service.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        port = config.service.port,
        contract = %config.token.contract_address,
        "Starting Bitmon rewards API"
    );

    // ── 3. Prometheus metrics registry ──────────────────────
    let metrics = Arc::new(ApiMetrics::new().context("Failed to register metrics")?);

    // ── 4. Connect to the Monad RPC ─────────────────────────
    let provider = Arc::new(
        MonadProvider::connect(&config.chain)
            .await
            .context("Failed to connect to the chain RPC")?,
    );

    // ── 5. Chain adapters: token reads + custodial transfer ─
    let tokens = Arc::new(
        BtmToken::new(Arc::clone(&provider), &config.token)
            .context("Failed to create token adapter")?,
    );
    let transferer = Arc::new(
        BtmTransferer::new(
            Arc::clone(&provider),
            &config.token,
            &config.chain,
            &config.rewards,
        )
        .context("Failed to create transfer adapter")?,
    );

    // ── 6. Open the point ledger ────────────────────────────
    let ledger: Arc<dyn PointsLedger> = match config.persistence.backend.as_str() {
        "journal" => Arc::new(
            JournalLedger::open(&config.persistence.data_dir)
                .await
                .context("Failed to open point journal")?,
        ),
        _ => Arc::new(MemoryLedger::new()),
    };

    // ── 7. Usecases ─────────────────────────────────────────
    let policy = ConversionPolicy::new(config.rewards.pvp_rate, config.rewards.pve_rate);
    let scoring = Arc::new(ScoringService::new(Arc::clone(&ledger)));
    let claims = Arc::new(ClaimCoordinator::new(
        ledger,
        transferer,
        policy,
        config.token.decimals,
    ));

    // ── 8. Serve the HTTP API ───────────────────────────────
    let state = AppState {
        scoring,
        claims,
        tokens,
        metrics,
        contract_address: config.token.contract_address.clone(),
        decimals: config.token.decimals,
    };
    let app = api::router(state);

    let addr = format!("{}:{}", config.service.bind_address, config.service.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(address = %addr, "Rewards API listening");

    // ── 9. Run until SIGINT/SIGTERM ─────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shutdown complete");
    Ok(())
}

/// Resolves on SIGINT (Ctrl-C) or, on Unix, SIGTERM — what container
/// orchestrators send on stop.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("SIGINT received, shutting down"),
        () = terminate => info!("SIGTERM received, shutting down"),
    }
}
