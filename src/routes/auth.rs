// SPDX-License-Identifier: MIT

//! Credential lifecycle: signup, login, logout, token refresh, password
//! reset, and email verification.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::AppendHeaders,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::user::{Profile, Role, User, UserView};
use crate::response::ApiResponse;
use crate::services::password;
use crate::time_utils::{format_utc_rfc3339, now_rfc3339};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh", post(refresh))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/verify-email", post(verify_email))
}

/// Reset tokens are valid for 10 minutes.
const RESET_TOKEN_EXPIRE_MINUTES: i64 = 10;

/// Random 32-byte token, hex encoded. Used for email verification and
/// password reset links.
fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Set-Cookie value storing the refresh token.
///
/// Scoped to the auth routes so it is never sent with API calls that only
/// need the access token.
fn refresh_cookie(state: &AppState, value: &str, max_age_secs: u64) -> String {
    let mut cookie = format!(
        "refresh_token={}; Path=/api/auth; Max-Age={}; HttpOnly; SameSite=Strict",
        value, max_age_secs
    );
    if state.config.is_production() {
        cookie.push_str("; Secure");
    }
    cookie
}

fn clear_refresh_cookie(state: &AppState) -> String {
    refresh_cookie(state, "", 0)
}

/// Refresh token from the cookie, falling back to the Bearer header.
fn extract_refresh_token(jar: &CookieJar, headers: &axum::http::HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get("refresh_token") {
        return Some(cookie.value().to_string());
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub last_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub user: UserView,
    pub access_token: String,
}

/// POST /api/auth/signup
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserView>>)> {
    body.validate()?;

    let email = body.email.to_lowercase();
    if state.db.get_user_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest(
            "An account with this email already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(&body.password).await?;
    let verification_token = random_token();
    let now = now_rfc3339();

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: email.clone(),
        password_hash,
        profile: Profile {
            first_name: body.first_name,
            last_name: body.last_name,
            ..Profile::default()
        },
        role: Role::User,
        is_email_verified: false,
        email_verification_token: Some(verification_token.clone()),
        password_reset_token: None,
        password_reset_expires: None,
        refresh_token: None,
        is_active: true,
        login_attempts: 0,
        lock_until: None,
        last_login: None,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.upsert_user(&user).await?;
    state
        .mailer
        .send_verification_email(&user.email, &verification_token)
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Account created. Please check your email to verify your address.",
            user.to_view(),
        )),
    ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

/// POST /api/auth/login
///
/// Unknown email and wrong password return the same 401 so the endpoint
/// does not reveal which accounts exist.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<(
    AppendHeaders<[(header::HeaderName, String); 1]>,
    Json<ApiResponse<AuthData>>,
)> {
    body.validate()?;

    let Some(mut user) = state.db.get_user_by_email(&body.email).await? else {
        return Err(AppError::InvalidCredentials);
    };

    let now = chrono::Utc::now();
    if user.is_locked(now) {
        return Err(AppError::AccountLocked);
    }

    if !password::verify_password(&body.password, &user.password_hash).await? {
        user.register_failed_login(now);
        user.updated_at = format_utc_rfc3339(now);
        state.db.upsert_user(&user).await?;
        if user.is_locked(now) {
            tracing::warn!(user_id = %user.id, "Account locked after repeated failures");
            return Err(AppError::AccountLocked);
        }
        return Err(AppError::InvalidCredentials);
    }

    if !user.is_email_verified {
        return Err(AppError::EmailNotVerified);
    }
    if !user.is_active {
        return Err(AppError::InvalidCredentials);
    }

    let pair = state.tokens.issue_pair(&user.id, user.role.as_str())?;

    user.reset_login_attempts();
    user.refresh_token = Some(pair.refresh_token.clone());
    user.last_login = Some(format_utc_rfc3339(now));
    user.updated_at = format_utc_rfc3339(now);
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    let cookie = refresh_cookie(&state, &pair.refresh_token, state.tokens.refresh_expire_secs());

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(ApiResponse::data(AuthData {
            user: user.to_view(),
            access_token: pair.access_token,
        })),
    ))
}

/// POST /api/auth/logout
///
/// Clears the stored refresh token (when the presented one is still valid)
/// and expires the cookie either way.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: axum::http::HeaderMap,
) -> Result<(
    AppendHeaders<[(header::HeaderName, String); 1]>,
    Json<ApiResponse<()>>,
)> {
    if let Some(token) = extract_refresh_token(&jar, &headers) {
        if let Ok(claims) = state.tokens.verify_refresh(&token) {
            if let Some(mut user) = state.db.get_user(&claims.sub).await? {
                if user.refresh_token.as_deref() == Some(token.as_str()) {
                    user.refresh_token = None;
                    user.updated_at = now_rfc3339();
                    state.db.upsert_user(&user).await?;
                    tracing::info!(user_id = %user.id, "User logged out");
                }
            }
        }
    }

    Ok((
        AppendHeaders([(header::SET_COOKIE, clear_refresh_cookie(&state))]),
        Json(ApiResponse::message("Logged out")),
    ))
}

/// POST /api/auth/refresh
///
/// Verifies the presented refresh token and rotates it: the stored token is
/// atomically swapped to a new value, so a replayed old token is rejected.
async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: axum::http::HeaderMap,
) -> Result<(
    AppendHeaders<[(header::HeaderName, String); 1]>,
    Json<ApiResponse<AuthData>>,
)> {
    let token = extract_refresh_token(&jar, &headers).ok_or(AppError::Unauthorized)?;

    let claims = state.tokens.verify_refresh(&token)?;

    let pair = state.tokens.issue_pair(&claims.sub, &claims.role)?;

    let user = state
        .db
        .rotate_refresh_token(&claims.sub, &token, &pair.refresh_token, &now_rfc3339())
        .await?
        .ok_or(AppError::InvalidToken)?;

    let cookie = refresh_cookie(&state, &pair.refresh_token, state.tokens.refresh_expire_secs());

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(ApiResponse::data(AuthData {
            user: user.to_view(),
            access_token: pair.access_token,
        })),
    ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

/// POST /api/auth/forgot-password
///
/// Always answers 200 with the same message; whether a mail was actually
/// sent is not observable from the response.
async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<()>>> {
    body.validate()?;

    if let Some(mut user) = state.db.get_user_by_email(&body.email).await? {
        let token = random_token();
        let expires = chrono::Utc::now() + chrono::Duration::minutes(RESET_TOKEN_EXPIRE_MINUTES);

        user.password_reset_token = Some(token.clone());
        user.password_reset_expires = Some(format_utc_rfc3339(expires));
        user.updated_at = now_rfc3339();
        state.db.upsert_user(&user).await?;

        state
            .mailer
            .send_password_reset_email(&user.email, &token)
            .await?;
        tracing::info!(user_id = %user.id, "Password reset email sent");
    }

    Ok(Json(ApiResponse::message(
        "If an account exists for that address, a reset link has been sent.",
    )))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub token: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
}

/// POST /api/auth/reset-password
async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>> {
    body.validate()?;

    let Some(mut user) = state.db.get_user_by_reset_token(&body.token).await? else {
        return Err(AppError::BadRequest(
            "Invalid or expired reset token".to_string(),
        ));
    };

    let now = chrono::Utc::now();
    let expired = user
        .password_reset_expires
        .as_deref()
        .and_then(|raw| chrono::DateTime::parse_from_rfc3339(raw).ok())
        .map(|expires| expires.with_timezone(&chrono::Utc) < now)
        .unwrap_or(true);
    if expired {
        return Err(AppError::BadRequest(
            "Invalid or expired reset token".to_string(),
        ));
    }

    user.password_hash = password::hash_password(&body.password).await?;
    user.password_reset_token = None;
    user.password_reset_expires = None;
    // Force re-login everywhere
    user.refresh_token = None;
    user.reset_login_attempts();
    user.updated_at = format_utc_rfc3339(now);
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, "Password reset");

    Ok(Json(ApiResponse::message(
        "Password updated. Please log in with your new password.",
    )))
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub token: String,
}

/// POST /api/auth/verify-email
async fn verify_email(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyEmailRequest>,
) -> Result<Json<ApiResponse<()>>> {
    body.validate()?;

    let Some(mut user) = state
        .db
        .get_user_by_verification_token(&body.token)
        .await?
    else {
        return Err(AppError::BadRequest(
            "Invalid verification token".to_string(),
        ));
    };

    user.is_email_verified = true;
    // Single use
    user.email_verification_token = None;
    user.updated_at = now_rfc3339();
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, "Email verified");

    Ok(Json(ApiResponse::message("Email verified. You can now log in.")))
}
