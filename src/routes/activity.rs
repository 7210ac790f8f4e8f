// SPDX-License-Identifier: MIT

//! Activity CRUD and aggregate stats.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::activity::{
    Activity, ActivityExercise, ActivityStats, GpsData, HeartRate, ACTIVITY_TYPES,
};
use crate::pagination::{PageQuery, Pagination};
use crate::response::ApiResponse;
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_activities).post(create_activity))
        .route("/stats", get(activity_stats))
        .route(
            "/{activity_id}",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
        .route("/{activity_id}/gps", post(upload_gps_data))
}

fn validate_activity_type(activity_type: &str) -> Result<()> {
    if ACTIVITY_TYPES.contains(&activity_type) {
        return Ok(());
    }
    Err(AppError::BadRequest(format!(
        "Unknown activity type '{}'",
        activity_type
    )))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    // Query strings and serde(flatten) do not mix for numeric fields, so
    // the page parameters are inlined rather than embedding PageQuery.
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Filter by activity type
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
}

impl ListQuery {
    fn page_query(&self) -> PageQuery {
        let defaults = PageQuery::default();
        PageQuery {
            page: self.page.unwrap_or(defaults.page),
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }
}

#[derive(Serialize)]
pub struct ActivityListView {
    pub activities: Vec<Activity>,
    pub pagination: Pagination,
}

/// GET /api/activity
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<ActivityListView>>> {
    if let Some(activity_type) = &query.activity_type {
        validate_activity_type(activity_type)?;
    }

    let page_query = query.page_query();
    let (page, limit) = page_query.normalize()?;
    let offset = page_query.offset()?;

    let (activities, total) = state
        .db
        .list_activities(&auth.user_id, query.activity_type.as_deref(), limit, offset)
        .await?;

    Ok(Json(ApiResponse::data(ActivityListView {
        activities,
        pagination: Pagination::new(page, limit, total),
    })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ActivityRequest {
    #[serde(rename = "type")]
    pub activity_type: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(range(min = 0.1, message = "must be positive"))]
    pub duration: f64,
    #[serde(default)]
    pub calories_burned: f64,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub steps: u64,
    pub heart_rate: Option<HeartRate>,
    pub gps_data: Option<GpsData>,
    #[serde(default)]
    pub exercises: Vec<ActivityExercise>,
    /// RFC3339; defaults to now
    pub completed_at: Option<String>,
}

/// POST /api/activity
async fn create_activity(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ActivityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Activity>>)> {
    body.validate()?;
    validate_activity_type(&body.activity_type)?;

    let now = now_rfc3339();
    let activity = Activity {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: auth.user_id.clone(),
        activity_type: body.activity_type,
        name: body.name,
        duration: body.duration,
        calories_burned: body.calories_burned,
        distance: body.distance,
        steps: body.steps,
        heart_rate: body.heart_rate,
        gps_data: body.gps_data,
        exercises: body.exercises,
        completed_at: body.completed_at.unwrap_or_else(|| now.clone()),
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.set_activity(&activity).await?;
    tracing::info!(user_id = %auth.user_id, activity_id = %activity.id, "Activity logged");

    Ok((StatusCode::CREATED, Json(ApiResponse::data(activity))))
}

/// GET /api/activity/{id}
async fn get_activity(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(activity_id): Path<String>,
) -> Result<Json<ApiResponse<Activity>>> {
    let activity = state
        .db
        .get_activity(&auth.user_id, &activity_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity not found".to_string()))?;
    Ok(Json(ApiResponse::data(activity)))
}

/// PUT /api/activity/{id}
async fn update_activity(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(activity_id): Path<String>,
    Json(body): Json<ActivityRequest>,
) -> Result<Json<ApiResponse<Activity>>> {
    body.validate()?;
    validate_activity_type(&body.activity_type)?;

    let mut activity = state
        .db
        .get_activity(&auth.user_id, &activity_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity not found".to_string()))?;

    activity.activity_type = body.activity_type;
    activity.name = body.name;
    activity.duration = body.duration;
    activity.calories_burned = body.calories_burned;
    activity.distance = body.distance;
    activity.steps = body.steps;
    activity.heart_rate = body.heart_rate;
    activity.gps_data = body.gps_data;
    activity.exercises = body.exercises;
    if let Some(completed_at) = body.completed_at {
        activity.completed_at = completed_at;
    }
    activity.updated_at = now_rfc3339();

    state.db.set_activity(&activity).await?;

    Ok(Json(ApiResponse::data(activity)))
}

/// DELETE /api/activity/{id}
async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(activity_id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    // Ownership check before the delete
    state
        .db
        .get_activity(&auth.user_id, &activity_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity not found".to_string()))?;

    state.db.delete_activity(&activity_id).await?;
    tracing::info!(user_id = %auth.user_id, activity_id = %activity_id, "Activity deleted");

    Ok(Json(ApiResponse::message("Activity deleted")))
}

#[derive(Debug, Deserialize)]
pub struct GpsRequest {
    /// [longitude, latitude] pairs
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    /// meters
    pub elevation: Option<f64>,
}

/// POST /api/activity/{id}/gps
///
/// Attach a GPS track to an already-logged activity, replacing any
/// previous track.
async fn upload_gps_data(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(activity_id): Path<String>,
    Json(body): Json<GpsRequest>,
) -> Result<Json<ApiResponse<Activity>>> {
    if body.coordinates.is_empty() {
        return Err(AppError::BadRequest(
            "GPS coordinates are required and must be a non-empty array".to_string(),
        ));
    }

    let mut activity = state
        .db
        .get_activity(&auth.user_id, &activity_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity not found".to_string()))?;

    activity.gps_data = Some(GpsData {
        coordinates: body.coordinates,
        start_location: body.start_location,
        end_location: body.end_location,
        elevation: body.elevation,
    });
    activity.updated_at = now_rfc3339();

    state.db.set_activity(&activity).await?;
    tracing::info!(user_id = %auth.user_id, activity_id = %activity.id, "GPS data uploaded");

    Ok(Json(ApiResponse::with_message(
        "GPS data uploaded successfully",
        activity,
    )))
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// Inclusive start of the window (RFC3339); defaults to 30 days ago.
    pub start: Option<String>,
    /// Exclusive end of the window (RFC3339); defaults to now.
    pub end: Option<String>,
}

/// GET /api/activity/stats
///
/// Reduces the window's activities in memory: totals, averages, and a
/// per-type breakdown.
async fn activity_stats(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ApiResponse<ActivityStats>>> {
    let now = chrono::Utc::now();
    let start = query
        .start
        .unwrap_or_else(|| crate::time_utils::format_utc_rfc3339(now - chrono::Duration::days(30)));
    let end = query
        .end
        .unwrap_or_else(|| crate::time_utils::format_utc_rfc3339(now));

    let activities = state
        .db
        .get_activities_in_range(&auth.user_id, &start, &end)
        .await?;

    Ok(Json(ApiResponse::data(ActivityStats::from_activities(
        &activities,
    ))))
}
