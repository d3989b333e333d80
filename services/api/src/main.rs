use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use api::{AppState, Settings, Stores, create_router, middleware::JwtConfig};
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use domain::memory::MemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting API service");

    let settings = Settings::load()?;
    let jwt_config = JwtConfig::from_env()?;

    let stores = if std::env::var("DATABASE_URL").is_ok() {
        // Initialize database connection pool
        let db_config = DatabaseConfig::from_env()?;
        let pool = init_pool(&db_config).await?;

        // Check database connectivity
        if health_check(&pool).await? {
            info!("Database connection successful");
        } else {
            anyhow::bail!("Failed to connect to database");
        }

        run_migrations(&pool).await?;
        Stores::postgres(pool)
    } else {
        warn!("DATABASE_URL not set, falling back to in-memory storage");
        Stores::shared(Arc::new(MemoryStore::new()))
    };

    let address = settings.address();
    let app = create_router(AppState::new(stores, jwt_config, settings));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
