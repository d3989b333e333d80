//! HTTP service of the media ratings platform
//!
//! Wraps the domain engines in axum handlers, verifies bearer tokens issued
//! by the auth service and backs the storage ports with PostgreSQL.

pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod settings;
pub mod state;

pub use routes::create_router;
pub use settings::Settings;
pub use state::{AppState, Stores};
