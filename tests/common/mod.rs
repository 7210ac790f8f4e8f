// SPDX-License-Identifier: MIT

use fittrack_api::config::Config;
use fittrack_api::db::FirestoreDb;
use fittrack_api::routes::create_router;
use fittrack_api::services::{Mailer, TokenIssuer};
use fittrack_api::AppState;
use std::sync::Arc;

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let tokens = TokenIssuer::new(&config);
    let mailer = Mailer::new_noop();

    let state = Arc::new(AppState {
        config,
        db,
        mailer,
        tokens,
    });

    (create_router(state.clone()), state)
}

/// Access token for a regular test user.
#[allow(dead_code)]
pub fn test_access_token(state: &AppState, user_id: &str) -> String {
    state
        .tokens
        .issue_pair(user_id, "user")
        .expect("token issuance")
        .access_token
}

/// Access token carrying the admin role.
#[allow(dead_code)]
pub fn test_admin_token(state: &AppState, user_id: &str) -> String {
    state
        .tokens
        .issue_pair(user_id, "admin")
        .expect("token issuance")
        .access_token
}
