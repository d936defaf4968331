//! Domain layer - Core reward business logic and models.
//!
//! This module contains the pure domain logic for the Bitmon rewards API.
//! No external dependencies allowed here (hexagonal architecture inner ring).
//! All types are serializable and testable in isolation.

pub mod conversion;
pub mod error;
pub mod player;
pub mod points;

// Re-export core types for convenience
pub use conversion::{ConversionPolicy, ConversionQuote};
pub use error::RewardError;
pub use player::{PlayerAddress, PointCategory};
pub use points::{ClaimOutcome, PendingClaim, PointBalance};
