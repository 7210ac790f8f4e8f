// SPDX-License-Identifier: MIT

//! Unauthenticated platform stats.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::response::ApiResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user-count", get(user_count))
        .route("/stats", get(platform_stats))
}

#[derive(Serialize)]
pub struct UserCountView {
    pub count: u64,
}

/// GET /api/public/user-count
async fn user_count(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<UserCountView>>> {
    let count = state.db.count_users().await?;
    Ok(Json(ApiResponse::data(UserCountView { count })))
}

#[derive(Serialize)]
pub struct PlatformStatsView {
    pub total_users: u64,
    pub active_challenges: u64,
}

/// GET /api/public/stats
async fn platform_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<PlatformStatsView>>> {
    let total_users = state.db.count_users().await?;
    let active_challenges = state.db.list_active_challenges().await?.len() as u64;

    Ok(Json(ApiResponse::data(PlatformStatsView {
        total_users,
        active_challenges,
    })))
}
