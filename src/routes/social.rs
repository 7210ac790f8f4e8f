// SPDX-License-Identifier: MIT

//! Social features: challenges, leaderboards, achievements, friends.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::social::{
    Achievement, AchievementProgress, Challenge, ChallengeTarget, Friend, FriendStatus,
    Participant,
};
use crate::response::ApiResponse;
use crate::time_utils::{format_utc_rfc3339, now_rfc3339};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/challenges", get(list_challenges))
        .route("/challenges/my", get(my_challenges))
        .route("/challenges/custom", post(create_custom_challenge))
        .route("/challenges/{challenge_id}/join", post(join_challenge))
        .route("/leaderboard/{challenge_id}", get(leaderboard))
        .route("/achievements", get(list_achievements))
        .route("/friends", get(list_friends))
        .route("/friends/invite", post(invite_friend))
}

/// Award a one-time milestone achievement, skipping it when already earned.
async fn award_milestone(
    state: &AppState,
    user_id: &str,
    name: &str,
    description: &str,
    category: &str,
    points: u32,
) -> Result<()> {
    let already_earned = state
        .db
        .list_achievements(user_id)
        .await?
        .iter()
        .any(|a| a.name == name);
    if already_earned {
        return Ok(());
    }

    let mut progress = AchievementProgress {
        current: 1.0,
        target: 1.0,
        percentage: 0,
    };
    progress.recompute();

    state
        .db
        .set_achievement(&Achievement {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            achievement_type: "milestone".to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            earned_at: now_rfc3339(),
            progress,
            challenge_id: None,
            rarity: "common".to_string(),
            points,
        })
        .await
}

/// Challenge plus the caller's relationship to it.
#[derive(Serialize)]
pub struct ChallengeView {
    #[serde(flatten)]
    pub challenge: Challenge,
    pub joined: bool,
    pub can_join: bool,
}

/// GET /api/social/challenges
async fn list_challenges(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<ChallengeView>>>> {
    let now = chrono::Utc::now();
    let views = state
        .db
        .list_active_challenges()
        .await?
        .into_iter()
        .map(|challenge| ChallengeView {
            joined: challenge.participant(&auth.user_id).is_some(),
            can_join: challenge.can_join(&auth.user_id, now),
            challenge,
        })
        .collect();
    Ok(Json(ApiResponse::data(views)))
}

/// GET /api/social/challenges/my
async fn my_challenges(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Challenge>>>> {
    let mine = state
        .db
        .list_active_challenges()
        .await?
        .into_iter()
        .filter(|c| c.participant(&auth.user_id).is_some())
        .collect();
    Ok(Json(ApiResponse::data(mine)))
}

/// POST /api/social/challenges/{id}/join
async fn join_challenge(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(challenge_id): Path<String>,
) -> Result<Json<ApiResponse<Challenge>>> {
    let mut challenge = state
        .db
        .get_challenge(&challenge_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Challenge not found".to_string()))?;

    let now = chrono::Utc::now();
    if challenge.participant(&auth.user_id).is_some() {
        return Err(AppError::BadRequest(
            "You have already joined this challenge".to_string(),
        ));
    }
    if !challenge.can_join(&auth.user_id, now) {
        return Err(AppError::BadRequest(
            "This challenge is not open for joining".to_string(),
        ));
    }

    let now_str = format_utc_rfc3339(now);
    challenge.participants.push(Participant {
        user_id: auth.user_id.clone(),
        joined_at: now_str.clone(),
        progress: 0.0,
        completed: false,
        last_updated: now_str.clone(),
    });
    challenge.updated_at = now_str;
    state.db.set_challenge(&challenge).await?;

    tracing::info!(user_id = %auth.user_id, challenge_id = %challenge.id, "Joined challenge");

    // The join itself succeeded; a failed award must not undo it
    if let Err(error) = award_milestone(
        &state,
        &auth.user_id,
        "First Challenge",
        "Joined your first challenge",
        "challenge",
        50,
    )
    .await
    {
        tracing::warn!(user_id = %auth.user_id, %error, "Failed to award milestone");
    }

    Ok(Json(ApiResponse::with_message(
        "Challenge joined",
        challenge,
    )))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CustomChallengeRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// individual or group
    #[serde(rename = "type", default = "default_challenge_type")]
    pub challenge_type: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub category: String,
    pub target: ChallengeTarget,
    /// RFC3339
    pub start_date: String,
    /// RFC3339
    pub end_date: String,
    pub max_participants: Option<u32>,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

fn default_challenge_type() -> String {
    "individual".to_string()
}

fn default_difficulty() -> String {
    "medium".to_string()
}

/// POST /api/social/challenges/custom
///
/// Creates a user-defined challenge; the creator joins automatically.
async fn create_custom_challenge(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CustomChallengeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Challenge>>)> {
    body.validate()?;

    let start = chrono::DateTime::parse_from_rfc3339(&body.start_date)
        .map_err(|_| AppError::BadRequest("start_date must be RFC3339".to_string()))?;
    let end = chrono::DateTime::parse_from_rfc3339(&body.end_date)
        .map_err(|_| AppError::BadRequest("end_date must be RFC3339".to_string()))?;
    if end <= start {
        return Err(AppError::BadRequest(
            "end_date must be after start_date".to_string(),
        ));
    }

    let now = now_rfc3339();
    let challenge = Challenge {
        id: uuid::Uuid::new_v4().to_string(),
        name: body.name,
        description: body.description,
        challenge_type: body.challenge_type,
        category: body.category,
        target: body.target,
        start_date: body.start_date,
        end_date: body.end_date,
        participants: vec![Participant {
            user_id: auth.user_id.clone(),
            joined_at: now.clone(),
            progress: 0.0,
            completed: false,
            last_updated: now.clone(),
        }],
        max_participants: body.max_participants,
        created_by: auth.user_id.clone(),
        difficulty: body.difficulty,
        is_active: true,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.set_challenge(&challenge).await?;
    tracing::info!(user_id = %auth.user_id, challenge_id = %challenge.id, "Custom challenge created");

    if let Err(error) = award_milestone(
        &state,
        &auth.user_id,
        "Challenge Creator",
        "Created your first custom challenge",
        "social",
        100,
    )
    .await
    {
        tracing::warn!(user_id = %auth.user_id, %error, "Failed to award milestone");
    }

    Ok((StatusCode::CREATED, Json(ApiResponse::data(challenge))))
}

#[derive(Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub progress: f64,
    pub completed: bool,
}

/// GET /api/social/leaderboard/{challenge_id}
async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Path(challenge_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<LeaderboardEntry>>>> {
    let challenge = state
        .db
        .get_challenge(&challenge_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Challenge not found".to_string()))?;

    let entries = challenge
        .leaderboard()
        .into_iter()
        .enumerate()
        .map(|(index, participant)| LeaderboardEntry {
            rank: index as u32 + 1,
            user_id: participant.user_id.clone(),
            progress: participant.progress,
            completed: participant.completed,
        })
        .collect();

    Ok(Json(ApiResponse::data(entries)))
}

/// GET /api/social/achievements
async fn list_achievements(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Achievement>>>> {
    let achievements = state.db.list_achievements(&auth.user_id).await?;
    Ok(Json(ApiResponse::data(achievements)))
}

/// GET /api/social/friends
async fn list_friends(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Friend>>>> {
    let friends = state.db.list_friends(&auth.user_id).await?;
    Ok(Json(ApiResponse::data(friends)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct FriendInviteRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

/// POST /api/social/friends/invite
///
/// Invites a registered user by email. The relation's composite doc id
/// keeps a pair from being invited twice.
async fn invite_friend(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<FriendInviteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Friend>>)> {
    body.validate()?;

    let Some(target) = state.db.get_user_by_email(&body.email).await? else {
        return Err(AppError::NotFound(
            "No account found for that email".to_string(),
        ));
    };

    if target.id == auth.user_id {
        return Err(AppError::BadRequest(
            "You cannot invite yourself".to_string(),
        ));
    }

    if state
        .db
        .get_friend(&auth.user_id, &target.id)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "A friend request already exists for this user".to_string(),
        ));
    }

    let friend = Friend {
        user_id: auth.user_id.clone(),
        friend_id: target.id.clone(),
        status: FriendStatus::Pending,
        requested_by: auth.user_id.clone(),
        accepted_at: None,
        created_at: now_rfc3339(),
    };
    state.db.set_friend(&friend).await?;

    tracing::info!(user_id = %auth.user_id, friend_id = %target.id, "Friend invite sent");

    Ok((StatusCode::CREATED, Json(ApiResponse::data(friend))))
}
