#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use backend::config::db::DbProfile;
use backend::error::AppError;
use backend::infra::state::build_state;
use backend::AppState;

// Logging is auto-installed for most test binaries
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

// Every test owns a private in-memory database, so committing is safe;
// can be flipped per-binary via `ROSTER_TXN_POLICY=rollback`.
#[ctor::ctor]
fn init_txn_policy() {
    let policy = match std::env::var("ROSTER_TXN_POLICY")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "rollback" => backend::db::txn_policy::TxnPolicy::RollbackOnOk,
        _ => backend::db::txn_policy::TxnPolicy::CommitOnOk,
    };

    backend::db::txn_policy::set_txn_policy(policy);
}

/// Fresh application state backed by a private in-memory SQLite database
/// with migrations applied.
pub async fn build_test_state() -> Result<AppState, AppError> {
    build_state().with_db(DbProfile::Test).build().await
}

/// Validate the bare client-error contract: expected status, an
/// `x-trace-id` header, and an empty body.
pub async fn assert_empty_client_error(resp: ServiceResponse<BoxBody>, expected_status: u16) {
    assert_eq!(resp.status().as_u16(), expected_status);

    let headers = resp.headers().clone();
    assert!(
        headers.get("x-trace-id").is_some(),
        "x-trace-id header should be present"
    );

    let body = test::read_body(resp).await;
    assert!(
        body.is_empty(),
        "client errors must have an empty body, got: {body:?}"
    );
}
