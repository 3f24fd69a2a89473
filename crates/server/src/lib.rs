//! Server crate for the movies API.
//!
//! This crate wires the catalog to HTTP: handlers for each CRUD intent,
//! the origin gate middleware, and the axum router that ties them together.

pub mod config;
pub mod error;
pub mod handlers;
pub mod origin;
pub mod routes;

pub use config::ServerConfig;
pub use error::ApiError;
pub use origin::{OriginDecision, OriginGate};
pub use routes::{router, run, serve, AppState};
