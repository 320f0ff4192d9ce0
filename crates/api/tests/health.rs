//! Integration test for the health endpoint.

mod common;

use axum::http::StatusCode;
use common::*;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_db_and_burn_queue(pool: PgPool) {
    let (app, _root) = build_test_app(pool);

    let response = get(app, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    // The test environment configures two encoder slots, none in use.
    assert_eq!(json["burn_capacity"], 2);
    assert_eq!(json["burns_in_flight"], 0);
}
