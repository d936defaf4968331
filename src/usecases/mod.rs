//! Usecases Layer - Reward Orchestration
//!
//! Coordinates domain logic with the ports:
//! - `ScoringService`: point accrual and balance reads
//! - `ClaimCoordinator`: the points-to-BTM claim state machine

pub mod claim;
pub mod scoring;

pub use claim::ClaimCoordinator;
pub use scoring::ScoringService;
