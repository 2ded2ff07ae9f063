//! # skyseat-api
//!
//! HTTP API layer for SkySeat built on Axum.
//!
//! Marshals check-in requests into the allocation engine and exposes the
//! administrative reset, seat release, seat map, and pool status. Handlers
//! are thin: every decision lives in `skyseat-service`.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
