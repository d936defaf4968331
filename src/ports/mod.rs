//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires from
//! the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `PointsLedger`: the reward point store (in-memory or journaled)
//! - `ChainTransferer`: the single on-chain disbursement capability
//! - `TokenQuery`: read-only BTM token metadata and balance lookups

pub mod ledger;
pub mod token_query;
pub mod transferer;
