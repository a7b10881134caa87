//! # talentflow-api
//!
//! Simulated backend for the TalentFlow hiring-pipeline UI.
//!
//! This binary provides:
//! - **REST-shaped route table** (axum) for jobs, candidates, and per-job
//!   assessments, backed by the SQLite record store
//! - **Chaos middleware** applying a fixed artificial latency on every call
//!   and a probabilistic 500 on mutating verbs, so clients have realistic
//!   failures to cope with
//! - **Fixture seeder** loading the demo dataset (10 jobs, 1000 candidates,
//!   2 assessments) exactly once at startup

mod api;
mod chaos;
mod config;
mod error;
mod fixtures;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use talentflow_store::Database;

use crate::api::AppState;
use crate::chaos::ChaosPolicy;
use crate::config::ApiConfig;
use crate::fixtures::Seeder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,talentflow_api=debug")),
        )
        .init();

    info!("Starting TalentFlow API v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ApiConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Open the record store and seed the demo dataset
    // -----------------------------------------------------------------------
    let mut db = match &config.db_path {
        Some(path) => Database::open_at(path)?,
        None => Database::open_in_memory()?,
    };

    // The seeder object is the process-wide "already initialized" guard;
    // this is its single invocation.
    let mut seeder = Seeder::new();
    if config.seed_fixtures {
        seeder
            .run(&mut db, config.candidate_count)
            .context("failed to seed demo fixtures")?;
    }

    let state = AppState {
        store: Arc::new(Mutex::new(db)),
        chaos: ChaosPolicy::new(config.latency, config.failure_rate),
    };

    // -----------------------------------------------------------------------
    // 4. Run the HTTP server (blocks until shutdown)
    // -----------------------------------------------------------------------
    let http_addr = config.http_addr;

    tokio::select! {
        result = api::serve(state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
