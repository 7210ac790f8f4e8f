// SPDX-License-Identifier: MIT

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Daily nutrition logs (keyed by `{user_id}_{YYYY-MM-DD}`)
    pub const NUTRITION_LOGS: &str = "nutrition_logs";
    pub const ACTIVITIES: &str = "activities";
    /// Shared exercise catalog
    pub const EXERCISES: &str = "exercises";
    pub const WORKOUT_PLANS: &str = "workout_plans";
    pub const WORKOUT_SESSIONS: &str = "workout_sessions";
    pub const CHALLENGES: &str = "challenges";
    pub const ACHIEVEMENTS: &str = "achievements";
    /// Friend relations (keyed by `{user_id}_{friend_id}`)
    pub const FRIENDS: &str = "friends";
}
