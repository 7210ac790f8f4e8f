// SPDX-License-Identifier: MIT

//! Administrative endpoints. Mounted behind `require_admin`; regular users
//! never learn these routes exist.

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::user::{Role, User, UserView};
use crate::pagination::{PageQuery, Pagination};
use crate::response::ApiResponse;
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/users", get(list_users))
        // Static segment, so it never collides with the {user_id} capture
        .route("/users/bulk", patch(bulk_update_users))
        .route("/users/{user_id}", get(get_user))
        .route("/users/{user_id}/status", put(set_user_status))
        .route("/users/{user_id}/role", put(set_user_role))
}

#[derive(Serialize)]
pub struct DashboardView {
    pub total_users: u64,
    pub active_users: u64,
    pub verified_users: u64,
    pub admins: u64,
}

/// GET /api/admin/dashboard
async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DashboardView>>> {
    // Small platform: a full scan of the users collection is fine here.
    let (users, total) = state.db.list_users(u32::MAX, 0).await?;

    let view = DashboardView {
        total_users: total,
        active_users: users.iter().filter(|u| u.is_active).count() as u64,
        verified_users: users.iter().filter(|u| u.is_email_verified).count() as u64,
        admins: users.iter().filter(|u| u.role == Role::Admin).count() as u64,
    };
    Ok(Json(ApiResponse::data(view)))
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    // Inlined rather than a flattened PageQuery; query-string deserialization
    // cannot coerce numeric fields through serde(flatten).
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Substring match on email or name
    pub search: Option<String>,
}

impl UserListQuery {
    fn page_query(&self) -> PageQuery {
        let defaults = PageQuery::default();
        PageQuery {
            page: self.page.unwrap_or(defaults.page),
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }
}

#[derive(Serialize)]
pub struct UserListView {
    pub users: Vec<UserView>,
    pub pagination: Pagination,
}

fn matches_search(user: &User, needle: &str) -> bool {
    user.email.to_lowercase().contains(needle)
        || user.profile.first_name.to_lowercase().contains(needle)
        || user.profile.last_name.to_lowercase().contains(needle)
}

/// GET /api/admin/users
async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<ApiResponse<UserListView>>> {
    let page_query = query.page_query();
    let (page, limit) = page_query.normalize()?;
    let offset = page_query.offset()?;

    let (users, total) = match query.search.as_deref() {
        // Substring search happens in memory; Firestore has no contains
        // operator over strings.
        Some(raw) if !raw.trim().is_empty() => {
            let needle = raw.trim().to_lowercase();
            let (all, _) = state.db.list_users(u32::MAX, 0).await?;
            let matched: Vec<User> = all
                .into_iter()
                .filter(|u| matches_search(u, &needle))
                .collect();
            let total = matched.len() as u64;
            let users = matched
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect();
            (users, total)
        }
        _ => state.db.list_users(limit, offset).await?,
    };

    Ok(Json(ApiResponse::data(UserListView {
        users: users.iter().map(User::to_view).collect(),
        pagination: Pagination::new(page, limit, total),
    })))
}

/// GET /api/admin/users/{id}
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserView>>> {
    let user = state
        .db
        .get_user(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(ApiResponse::data(user.to_view())))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub is_active: bool,
}

/// PUT /api/admin/users/{id}/status
///
/// Deactivation also clears the stored refresh token so the user cannot
/// mint new access tokens.
async fn set_user_status(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<ApiResponse<UserView>>> {
    let mut user = state
        .db
        .get_user(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    user.is_active = body.is_active;
    if !body.is_active {
        user.refresh_token = None;
    }
    user.updated_at = now_rfc3339();
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, is_active = user.is_active, "User status changed");

    Ok(Json(ApiResponse::data(user.to_view())))
}

/// Bulk action applied to a list of users.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BulkAction {
    Activate,
    Deactivate,
    Verify,
    ChangeRole,
}

#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    pub user_ids: Vec<String>,
    pub action: BulkAction,
    /// Target role, required for `changeRole`
    pub value: Option<Role>,
}

#[derive(Serialize)]
pub struct BulkUpdateView {
    /// Users found among the requested ids
    pub matched: usize,
    /// Users actually written
    pub modified: usize,
}

/// PATCH /api/admin/users/bulk
///
/// Applies one action to many users. Unknown ids are skipped rather than
/// failing the whole batch.
async fn bulk_update_users(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BulkUpdateRequest>,
) -> Result<Json<ApiResponse<BulkUpdateView>>> {
    if body.user_ids.is_empty() {
        return Err(AppError::BadRequest(
            "user_ids must be a non-empty array".to_string(),
        ));
    }
    let role = match body.action {
        BulkAction::ChangeRole => Some(body.value.ok_or_else(|| {
            AppError::BadRequest("value is required for changeRole".to_string())
        })?),
        _ => None,
    };

    let mut matched = 0;
    let mut modified = 0;
    for user_id in &body.user_ids {
        let Some(mut user) = state.db.get_user(user_id).await? else {
            continue;
        };
        matched += 1;

        match body.action {
            BulkAction::Activate => user.is_active = true,
            BulkAction::Deactivate => {
                user.is_active = false;
                // Same as single-user deactivation: revoke the session
                user.refresh_token = None;
            }
            BulkAction::Verify => {
                user.is_email_verified = true;
                user.email_verification_token = None;
            }
            BulkAction::ChangeRole => {
                if let Some(role) = role {
                    user.role = role;
                }
            }
        }
        user.updated_at = now_rfc3339();
        state.db.upsert_user(&user).await?;
        modified += 1;
    }

    tracing::info!(
        requested = body.user_ids.len(),
        matched,
        modified,
        "Bulk user update applied"
    );

    Ok(Json(ApiResponse::with_message(
        "Bulk update completed",
        BulkUpdateView { matched, modified },
    )))
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

/// PUT /api/admin/users/{id}/role
async fn set_user_role(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(body): Json<RoleRequest>,
) -> Result<Json<ApiResponse<UserView>>> {
    let mut user = state
        .db
        .get_user(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    user.role = body.role;
    user.updated_at = now_rfc3339();
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User role changed");

    Ok(Json(ApiResponse::data(user.to_view())))
}
