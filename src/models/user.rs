// SPDX-License-Identifier: MIT

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failed logins before the account is locked.
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;
/// Lock duration once the attempt limit is hit.
pub const LOCK_DURATION_MINUTES: i64 = 15;

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// Notification channel preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub email: bool,
    pub sms: bool,
    pub push: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
            push: true,
        }
    }
}

/// Display and locale preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub units: String,
    pub language: String,
    pub timezone: String,
    #[serde(default)]
    pub notifications: NotificationPreferences,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            units: "metric".to_string(),
            language: "en".to_string(),
            timezone: "UTC".to_string(),
            notifications: NotificationPreferences::default(),
        }
    }
}

/// User profile (name, demographics, preferences).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    /// Height in cm
    pub height: Option<f64>,
    /// Weight in kg
    pub weight: Option<f64>,
    pub profile_picture: Option<String>,
    pub fitness_level: Option<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub preferences: Preferences,
}

/// User document stored in Firestore.
///
/// Secret fields (password hash, tokens) never leave the server; the API
/// exposes [`UserView`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Document ID (uuid)
    pub id: String,
    /// Email address (unique, lowercased)
    pub email: String,
    /// Argon2 password hash
    pub password_hash: String,
    #[serde(default)]
    pub profile: Profile,
    pub role: Role,
    #[serde(default)]
    pub is_email_verified: bool,
    pub email_verification_token: Option<String>,
    pub password_reset_token: Option<String>,
    /// Reset token expiry (RFC3339)
    pub password_reset_expires: Option<String>,
    /// Currently valid refresh token; rotated on each use
    pub refresh_token: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub login_attempts: u32,
    /// Lockout expiry (RFC3339)
    pub lock_until: Option<String>,
    pub last_login: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Whether the account is currently locked out.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.lock_until
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|until| until.with_timezone(&Utc) > now)
            .unwrap_or(false)
    }

    /// Record a failed login attempt, locking the account when the limit
    /// is reached.
    pub fn register_failed_login(&mut self, now: DateTime<Utc>) {
        self.login_attempts += 1;
        if self.login_attempts >= MAX_LOGIN_ATTEMPTS {
            let until = now + chrono::Duration::minutes(LOCK_DURATION_MINUTES);
            self.lock_until = Some(crate::time_utils::format_utc_rfc3339(until));
        }
    }

    /// Clear the failure counter and lockout after a successful login.
    pub fn reset_login_attempts(&mut self) {
        self.login_attempts = 0;
        self.lock_until = None;
    }

    /// Replace the stored refresh token, but only if the presented token
    /// matches the stored one. Returns whether the swap happened.
    ///
    /// This is the compare half of the rotation compare-and-swap; the write
    /// half runs inside a Firestore transaction so concurrent rotations
    /// cannot both succeed.
    pub fn swap_refresh_token(&mut self, presented: &str, replacement: &str, now: &str) -> bool {
        if self.refresh_token.as_deref() != Some(presented) {
            return false;
        }
        self.refresh_token = Some(replacement.to_string());
        self.updated_at = now.to_string();
        true
    }

    /// Sanitized view for API responses.
    pub fn to_view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            email: self.email.clone(),
            profile: self.profile.clone(),
            role: self.role,
            is_email_verified: self.is_email_verified,
            is_active: self.is_active,
            last_login: self.last_login.clone(),
            created_at: self.created_at.clone(),
        }
    }
}

/// User representation returned by the API (secret fields stripped).
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub profile: Profile,
    pub role: Role,
    pub is_email_verified: bool,
    pub is_active: bool,
    pub last_login: Option<String>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user() -> User {
        let now = crate::time_utils::now_rfc3339();
        User {
            id: "u1".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            profile: Profile::default(),
            role: Role::User,
            is_email_verified: true,
            email_verification_token: None,
            password_reset_token: None,
            password_reset_expires: None,
            refresh_token: None,
            is_active: true,
            login_attempts: 0,
            lock_until: None,
            last_login: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    #[test]
    fn test_lockout_after_max_attempts() {
        let mut user = make_user();
        let now = Utc::now();

        for _ in 0..MAX_LOGIN_ATTEMPTS - 1 {
            user.register_failed_login(now);
        }
        assert!(!user.is_locked(now));

        user.register_failed_login(now);
        assert!(user.is_locked(now));

        // Lock expires after the window
        let later = now + chrono::Duration::minutes(LOCK_DURATION_MINUTES + 1);
        assert!(!user.is_locked(later));
    }

    #[test]
    fn test_reset_clears_lockout() {
        let mut user = make_user();
        let now = Utc::now();
        for _ in 0..MAX_LOGIN_ATTEMPTS {
            user.register_failed_login(now);
        }
        user.reset_login_attempts();
        assert_eq!(user.login_attempts, 0);
        assert!(!user.is_locked(now));
    }

    #[test]
    fn test_refresh_token_swap_consumes_old_value() {
        let mut user = make_user();
        user.refresh_token = Some("current".to_string());

        assert!(user.swap_refresh_token("current", "next", "2024-03-05T10:00:00Z"));
        assert_eq!(user.refresh_token.as_deref(), Some("next"));
        assert_eq!(user.updated_at, "2024-03-05T10:00:00Z");

        // Replaying the consumed token must not rotate again
        assert!(!user.swap_refresh_token("current", "stolen", "2024-03-05T10:00:01Z"));
        assert_eq!(user.refresh_token.as_deref(), Some("next"));
    }

    #[test]
    fn test_refresh_token_swap_refuses_mismatch() {
        let mut user = make_user();
        user.refresh_token = Some("current".to_string());

        assert!(!user.swap_refresh_token("forged", "next", "2024-03-05T10:00:00Z"));
        assert_eq!(user.refresh_token.as_deref(), Some("current"));
    }

    #[test]
    fn test_refresh_token_swap_refuses_when_none_stored() {
        let mut user = make_user();

        // Logged-out user has no stored token; nothing matches
        assert!(!user.swap_refresh_token("anything", "next", "2024-03-05T10:00:00Z"));
        assert!(user.refresh_token.is_none());
    }

    #[test]
    fn test_view_strips_secret_fields() {
        let mut user = make_user();
        user.refresh_token = Some("secret".to_string());
        user.password_reset_token = Some("secret".to_string());

        let body = serde_json::to_value(user.to_view()).unwrap();
        assert!(body.get("password_hash").is_none());
        assert!(body.get("refresh_token").is_none());
        assert!(body.get("password_reset_token").is_none());
        assert_eq!(body["email"], "test@example.com");
    }
}
