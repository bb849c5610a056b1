//! PostgreSQL `PlanRepository` behavior.
//!
//! Requires a migrated database; run with `cargo test -- --ignored`.

mod common;

use madori_db::test_fixtures::test_database_url;
use madori_db::Database;

async fn connect() -> Database {
    let _ = dotenvy::dotenv();
    Database::connect(&test_database_url())
        .await
        .expect("test database must be reachable")
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_insert_fetch_list() {
    common::insert_fetch_list(&connect().await.plans).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_insert_conflicts() {
    common::duplicate_insert_conflicts(&connect().await.plans).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_other_company_is_not_found() {
    common::other_company_is_not_found(&connect().await.plans).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_update_regenerates_title() {
    common::update_regenerates_title(&connect().await.plans).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_stale_version_conflicts() {
    common::stale_version_conflicts(&connect().await.plans).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_invalid_update_is_rejected() {
    common::invalid_update_is_rejected(&connect().await.plans).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_toggle_favorite_flips() {
    common::toggle_favorite_flips(&connect().await.plans).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_delete_removes() {
    common::delete_removes(&connect().await.plans).await;
}
