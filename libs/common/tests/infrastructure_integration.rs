//! Infrastructure integration tests
//!
//! These tests require a running PostgreSQL instance and are skipped unless
//! `TEST_DATABASE_URL` is set.

use common::database::{self, DatabaseConfig};

#[tokio::test]
async fn test_database_connectivity_and_migrations() {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping database integration test");
        return;
    };

    let config = DatabaseConfig {
        database_url,
        max_connections: 2,
    };

    let pool = database::init_pool(&config)
        .await
        .expect("Failed to initialize pool");

    database::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let healthy = database::health_check(&pool)
        .await
        .expect("Health check failed");
    assert!(healthy);
}
