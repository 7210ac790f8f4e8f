// SPDX-License-Identifier: MIT

//! Account profile, preferences, and health metrics.

use axum::{
    extract::State,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::user::{Preferences, UserView};
use crate::response::ApiResponse;
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/preferences", get(get_preferences).put(update_preferences))
        .route(
            "/health-metrics",
            get(get_health_metrics).put(update_health_metrics),
        )
        .route("/account", delete(delete_account))
}

async fn load_user(state: &AppState, user_id: &str) -> Result<crate::models::User> {
    state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// GET /api/user/profile
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserView>>> {
    let user = load_user(&state, &auth.user_id).await?;
    Ok(Json(ApiResponse::data(user.to_view())))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    /// cm
    #[validate(range(min = 30.0, max = 300.0, message = "must be between 30 and 300 cm"))]
    pub height: Option<f64>,
    /// kg
    #[validate(range(min = 10.0, max = 500.0, message = "must be between 10 and 500 kg"))]
    pub weight: Option<f64>,
    pub fitness_level: Option<String>,
    pub goals: Option<Vec<String>>,
}

/// PUT /api/user/profile
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ProfileUpdateRequest>,
) -> Result<Json<ApiResponse<UserView>>> {
    body.validate()?;

    let mut user = load_user(&state, &auth.user_id).await?;

    if let Some(first_name) = body.first_name {
        user.profile.first_name = first_name;
    }
    if let Some(last_name) = body.last_name {
        user.profile.last_name = last_name;
    }
    if body.date_of_birth.is_some() {
        user.profile.date_of_birth = body.date_of_birth;
    }
    if body.gender.is_some() {
        user.profile.gender = body.gender;
    }
    if body.height.is_some() {
        user.profile.height = body.height;
    }
    if body.weight.is_some() {
        user.profile.weight = body.weight;
    }
    if body.fitness_level.is_some() {
        user.profile.fitness_level = body.fitness_level;
    }
    if let Some(goals) = body.goals {
        user.profile.goals = goals;
    }
    user.updated_at = now_rfc3339();

    state.db.upsert_user(&user).await?;

    Ok(Json(ApiResponse::data(user.to_view())))
}

/// GET /api/user/preferences
async fn get_preferences(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Preferences>>> {
    let user = load_user(&state, &auth.user_id).await?;
    Ok(Json(ApiResponse::data(user.profile.preferences)))
}

/// PUT /api/user/preferences
async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(preferences): Json<Preferences>,
) -> Result<Json<ApiResponse<Preferences>>> {
    let mut user = load_user(&state, &auth.user_id).await?;
    user.profile.preferences = preferences;
    user.updated_at = now_rfc3339();
    state.db.upsert_user(&user).await?;
    Ok(Json(ApiResponse::data(user.profile.preferences)))
}

#[derive(Serialize)]
pub struct HealthMetrics {
    /// cm
    pub height: Option<f64>,
    /// kg
    pub weight: Option<f64>,
    /// kg / m², when both height and weight are known
    pub bmi: Option<f64>,
}

fn bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    match (height_cm, weight_kg) {
        (Some(height), Some(weight)) if height > 0.0 => {
            let meters = height / 100.0;
            Some((weight / (meters * meters) * 10.0).round() / 10.0)
        }
        _ => None,
    }
}

/// GET /api/user/health-metrics
async fn get_health_metrics(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<HealthMetrics>>> {
    let user = load_user(&state, &auth.user_id).await?;
    Ok(Json(ApiResponse::data(HealthMetrics {
        height: user.profile.height,
        weight: user.profile.weight,
        bmi: bmi(user.profile.height, user.profile.weight),
    })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct HealthMetricsRequest {
    #[validate(range(min = 30.0, max = 300.0, message = "must be between 30 and 300 cm"))]
    pub height: Option<f64>,
    #[validate(range(min = 10.0, max = 500.0, message = "must be between 10 and 500 kg"))]
    pub weight: Option<f64>,
}

/// PUT /api/user/health-metrics
async fn update_health_metrics(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<HealthMetricsRequest>,
) -> Result<Json<ApiResponse<HealthMetrics>>> {
    body.validate()?;

    let mut user = load_user(&state, &auth.user_id).await?;
    if body.height.is_some() {
        user.profile.height = body.height;
    }
    if body.weight.is_some() {
        user.profile.weight = body.weight;
    }
    user.updated_at = now_rfc3339();
    state.db.upsert_user(&user).await?;

    Ok(Json(ApiResponse::data(HealthMetrics {
        height: user.profile.height,
        weight: user.profile.weight,
        bmi: bmi(user.profile.height, user.profile.weight),
    })))
}

/// DELETE /api/user/account
///
/// Hard delete: removes the user document and everything the user owns.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<()>>> {
    // Confirm the account still exists before cascading
    load_user(&state, &auth.user_id).await?;

    let deleted = state.db.delete_user_data(&auth.user_id).await?;
    tracing::info!(user_id = %auth.user_id, deleted, "Account deleted");

    Ok(Json(ApiResponse::message("Account deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_calculation() {
        // 70 kg at 175 cm -> 22.9
        assert_eq!(bmi(Some(175.0), Some(70.0)), Some(22.9));
        assert_eq!(bmi(None, Some(70.0)), None);
        assert_eq!(bmi(Some(175.0), None), None);
        assert_eq!(bmi(Some(0.0), Some(70.0)), None);
    }
}
