use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod error;
mod jwt;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod storage;
mod validation;

use common::database;

use crate::jwt::{JwtConfig, JwtService};
use crate::repositories::{EventRepository, GroupRepository, RsvpRepository, UserRepository};
use crate::state::AppState;
use crate::storage::BannerStorage;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Apply pending schema migrations
    database::run_migrations(&pool).await?;
    info!("Database migrations applied");

    // Initialize JWT service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    // Initialize banner storage (S3 or local fallback)
    let banner_storage = BannerStorage::from_env().await;

    let app_state = AppState {
        db_pool: pool.clone(),
        jwt_service,
        user_repository: UserRepository::new(pool.clone()),
        group_repository: GroupRepository::new(pool.clone()),
        event_repository: EventRepository::new(pool.clone()),
        rsvp_repository: RsvpRepository::new(pool),
        banner_storage,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("API service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
