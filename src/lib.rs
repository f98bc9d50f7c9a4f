//! Exam backend library: questions, per-user answers and the update reconciler.

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod protocol;
pub mod reconcile;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use routes::build_router;
pub use state::AppState;
