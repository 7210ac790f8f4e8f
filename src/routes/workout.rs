// SPDX-License-Identifier: MIT

//! Workout plans, sessions, and the shared exercise catalog.

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
use crate::models::workout::{
    schedule_exercise_ids, Exercise, SessionExercise, SessionStatus, WorkoutDay, WorkoutPlan,
    WorkoutSession, WEEKDAYS,
};
use crate::pagination::{PageQuery, Pagination};
use crate::response::ApiResponse;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use futures_util::{stream, StreamExt, TryStreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/plans", get(list_plans).post(create_plan))
        .route(
            "/plans/{plan_id}",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
        .route("/plans/{plan_id}/start", post(start_session))
        .route("/sessions", get(list_sessions).post(log_session))
        .route("/exercises", get(list_exercises))
}

/// Check that every referenced exercise id exists in the catalog and every
/// schedule day is a real weekday.
async fn validate_schedule(state: &AppState, schedule: &[WorkoutDay]) -> Result<()> {
    for day in schedule {
        if !WEEKDAYS.contains(&day.day.to_lowercase().as_str()) {
            return Err(AppError::BadRequest(format!(
                "Unknown weekday '{}'",
                day.day
            )));
        }
    }

    // Existence checks run concurrently with a cap
    stream::iter(schedule_exercise_ids(schedule))
        .map(|exercise_id| async move {
            match state.db.get_exercise(&exercise_id).await? {
                Some(_) => Ok(()),
                None => Err(AppError::BadRequest(format!(
                    "Exercise '{}' does not exist",
                    exercise_id
                ))),
            }
        })
        .buffer_unordered(MAX_CONCURRENT_DB_OPS)
        .try_collect::<Vec<()>>()
        .await?;

    Ok(())
}

/// GET /api/workout/plans
async fn list_plans(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<WorkoutPlan>>>> {
    let plans = state.db.list_workout_plans(&auth.user_id).await?;
    Ok(Json(ApiResponse::data(plans)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct PlanRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub difficulty: String,
    /// weeks
    #[validate(range(min = 1, message = "must be at least one week"))]
    pub duration: u32,
    #[serde(default)]
    pub schedule: Vec<WorkoutDay>,
    #[serde(default)]
    pub goals: Vec<String>,
}

/// POST /api/workout/plans
async fn create_plan(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<PlanRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WorkoutPlan>>)> {
    body.validate()?;
    validate_schedule(&state, &body.schedule).await?;

    let now = now_rfc3339();
    let plan = WorkoutPlan {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: auth.user_id.clone(),
        name: body.name,
        description: body.description,
        difficulty: body.difficulty,
        duration: body.duration,
        schedule: body.schedule,
        goals: body.goals,
        is_active: true,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.set_workout_plan(&plan).await?;
    tracing::info!(user_id = %auth.user_id, plan_id = %plan.id, "Workout plan created");

    Ok((StatusCode::CREATED, Json(ApiResponse::data(plan))))
}

/// GET /api/workout/plans/{id}
async fn get_plan(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(plan_id): Path<String>,
) -> Result<Json<ApiResponse<WorkoutPlan>>> {
    let plan = state
        .db
        .get_workout_plan(&auth.user_id, &plan_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout plan not found".to_string()))?;
    Ok(Json(ApiResponse::data(plan)))
}

/// PUT /api/workout/plans/{id}
async fn update_plan(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(plan_id): Path<String>,
    Json(body): Json<PlanRequest>,
) -> Result<Json<ApiResponse<WorkoutPlan>>> {
    body.validate()?;
    validate_schedule(&state, &body.schedule).await?;

    let mut plan = state
        .db
        .get_workout_plan(&auth.user_id, &plan_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout plan not found".to_string()))?;

    plan.name = body.name;
    plan.description = body.description;
    plan.difficulty = body.difficulty;
    plan.duration = body.duration;
    plan.schedule = body.schedule;
    plan.goals = body.goals;
    plan.updated_at = now_rfc3339();

    state.db.set_workout_plan(&plan).await?;

    Ok(Json(ApiResponse::data(plan)))
}

/// DELETE /api/workout/plans/{id}
async fn delete_plan(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(plan_id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state
        .db
        .get_workout_plan(&auth.user_id, &plan_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout plan not found".to_string()))?;

    state.db.delete_workout_plan(&plan_id).await?;
    tracing::info!(user_id = %auth.user_id, plan_id = %plan_id, "Workout plan deleted");

    Ok(Json(ApiResponse::message("Workout plan deleted")))
}

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    /// Weekday to start; defaults to today.
    pub day: Option<String>,
}

/// POST /api/workout/plans/{id}/start
///
/// Creates an `in-progress` session from the plan's schedule for the day.
/// A plan can have at most one running session.
async fn start_session(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(plan_id): Path<String>,
    Json(body): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WorkoutSession>>)> {
    let plan = state
        .db
        .get_workout_plan(&auth.user_id, &plan_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout plan not found".to_string()))?;

    let day = body
        .day
        .map(|d| d.to_lowercase())
        .unwrap_or_else(|| chrono::Utc::now().format("%A").to_string().to_lowercase());

    let Some(day_workout) = plan.day_workout(&day) else {
        return Err(AppError::BadRequest(format!(
            "The plan has no workout scheduled for {}",
            day
        )));
    };

    if state
        .db
        .find_active_session(&auth.user_id, &plan_id)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "A session for this plan is already in progress".to_string(),
        ));
    }

    let now = now_rfc3339();
    let session = WorkoutSession {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: auth.user_id.clone(),
        workout_plan_id: plan.id.clone(),
        day: day.clone(),
        start_time: now.clone(),
        end_time: None,
        total_duration: 0.0,
        exercises: day_workout
            .exercises
            .iter()
            .map(|e| SessionExercise {
                exercise_id: e.exercise_id.clone(),
                sets: Vec::new(),
            })
            .collect(),
        status: SessionStatus::InProgress,
        calories_burned: 0.0,
        notes: None,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.set_workout_session(&session).await?;
    tracing::info!(user_id = %auth.user_id, session_id = %session.id, day = %day, "Workout session started");

    Ok((StatusCode::CREATED, Json(ApiResponse::data(session))))
}

#[derive(Serialize)]
pub struct SessionListView {
    pub sessions: Vec<WorkoutSession>,
    pub pagination: Pagination,
}

/// GET /api/workout/sessions
async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<SessionListView>>> {
    let (page, limit) = query.normalize()?;
    let offset = query.offset()?;

    let (sessions, total) = state
        .db
        .list_workout_sessions(&auth.user_id, limit, offset)
        .await?;

    Ok(Json(ApiResponse::data(SessionListView {
        sessions,
        pagination: Pagination::new(page, limit, total),
    })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LogSessionRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub session_id: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub exercises: Vec<SessionExercise>,
    #[serde(default)]
    pub calories_burned: f64,
    pub notes: Option<String>,
}

/// POST /api/workout/sessions
///
/// Closes a running session. Only `in-progress → completed | cancelled` is
/// allowed; anything else is a 400.
async fn log_session(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<LogSessionRequest>,
) -> Result<Json<ApiResponse<WorkoutSession>>> {
    body.validate()?;

    let mut session = state
        .db
        .get_workout_session(&auth.user_id, &body.session_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout session not found".to_string()))?;

    if !session.status.can_transition_to(body.status) {
        return Err(AppError::BadRequest(format!(
            "Cannot change session status from '{}' to '{}'",
            session.status.as_str(),
            body.status.as_str()
        )));
    }

    let now = chrono::Utc::now();
    session.status = body.status;
    session.end_time = Some(crate::time_utils::format_utc_rfc3339(now));
    session.total_duration = chrono::DateTime::parse_from_rfc3339(&session.start_time)
        .map(|start| (now - start.with_timezone(&chrono::Utc)).num_seconds() as f64 / 60.0)
        .unwrap_or(0.0)
        .max(0.0);
    if !body.exercises.is_empty() {
        session.exercises = body.exercises;
    }
    session.calories_burned = body.calories_burned;
    session.notes = body.notes;
    session.updated_at = crate::time_utils::format_utc_rfc3339(now);

    state.db.set_workout_session(&session).await?;
    tracing::info!(
        user_id = %auth.user_id,
        session_id = %session.id,
        status = session.status.as_str(),
        "Workout session closed"
    );

    Ok(Json(ApiResponse::data(session)))
}

#[derive(Debug, Deserialize)]
pub struct ExerciseQuery {
    // Inlined rather than a flattened PageQuery; query-string deserialization
    // cannot coerce numeric fields through serde(flatten).
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
}

impl ExerciseQuery {
    fn page_query(&self) -> PageQuery {
        let defaults = PageQuery::default();
        PageQuery {
            page: self.page.unwrap_or(defaults.page),
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }
}

#[derive(Serialize)]
pub struct ExerciseListView {
    pub exercises: Vec<Exercise>,
    pub pagination: Pagination,
}

/// GET /api/workout/exercises
async fn list_exercises(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExerciseQuery>,
) -> Result<Json<ApiResponse<ExerciseListView>>> {
    let page_query = query.page_query();
    let (page, limit) = page_query.normalize()?;
    let offset = page_query.offset()? as usize;

    let all = state.db.list_exercises(query.category.as_deref()).await?;
    let total = all.len() as u64;
    let exercises = all.into_iter().skip(offset).take(limit as usize).collect();

    Ok(Json(ApiResponse::data(ExerciseListView {
        exercises,
        pagination: Pagination::new(page, limit, total),
    })))
}
