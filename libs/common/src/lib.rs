//! Common library for the media ratings platform
//!
//! This crate provides shared infrastructure used by the services of the
//! platform: PostgreSQL connectivity, schema migrations and the database
//! error type.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool, health_check, run_migrations};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let is_healthy = health_check(&pool).await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
