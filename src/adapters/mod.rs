//! Adapters Layer - Port Implementations
//!
//! Concrete implementations of the ports, organized by concern:
//! - `api`: axum HTTP surface for the game client
//! - `chain`: alloy-rs adapters against the Monad RPC (token reads + transfer)
//! - `metrics`: Prometheus registry and exposition
//! - `persistence`: point ledger stores (in-memory, JSONL journal)

pub mod api;
pub mod chain;
pub mod metrics;
pub mod persistence;
