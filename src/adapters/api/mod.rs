//! API Adapter - Game-facing HTTP Surface
//!
//! The axum 0.7 HTTP layer the game client talks to. Thin by design:
//! handlers parse and validate input, call a usecase, and map the
//! `RewardError` taxonomy onto status codes. No reward logic lives here.

pub mod handlers;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use routes::router;
