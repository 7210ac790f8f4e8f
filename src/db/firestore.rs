// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts, credentials, profiles)
//! - Nutrition logs (one document per user per day)
//! - Activities
//! - Workouts (exercise catalog, plans, sessions)
//! - Social (challenges, achievements, friends)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{
    Achievement, Activity, Challenge, Exercise, Friend, NutritionLog, User, WorkoutPlan,
    WorkoutSession,
};
use futures_util::FutureExt;
use serde::{de::DeserializeOwned, Serialize};

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Generic Document Helpers ────────────────────────────────

    async fn get_doc<T: DeserializeOwned + Send>(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> Result<Option<T>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn set_doc<T: Serialize + DeserializeOwned + Send + Sync>(
        &self,
        collection: &str,
        doc_id: &str,
        object: &T,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(doc_id)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete_doc(&self, collection: &str, doc_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(doc_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count documents in a collection owned by a user.
    async fn count_for_user(&self, collection: &str, user_id: &str) -> Result<u64, AppError> {
        let user_id = user_id.to_string();
        let docs = self
            .get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(docs.len() as u64)
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by document ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, user_id).await
    }

    /// Find a user by email (emails are stored lowercased).
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_lowercase();
        let mut users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.pop())
    }

    /// Find a user by email verification token.
    pub async fn get_user_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<User>, AppError> {
        let token = token.to_string();
        let mut users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("email_verification_token").eq(token.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.pop())
    }

    /// Find a user by password reset token. Expiry is checked by the caller.
    pub async fn get_user_by_reset_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let token = token.to_string();
        let mut users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("password_reset_token").eq(token.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.pop())
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.set_doc(collections::USERS, &user.id, user).await
    }

    /// List users with pagination (admin). Returns `(users, total_count)`.
    pub async fn list_users(&self, limit: u32, offset: u32) -> Result<(Vec<User>, u64), AppError> {
        let total = self.count_users().await?;

        let users = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(limit)
            .offset(offset)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((users, total))
    }

    /// Total number of registered users.
    pub async fn count_users(&self) -> Result<u64, AppError> {
        let docs = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(docs.len() as u64)
    }

    /// Atomically rotate a user's refresh token.
    ///
    /// Runs a read-write transaction: the user is read through the
    /// transaction-scoped client, so the commit aborts (and retries with
    /// fresh data) when the document changed underneath us. A concurrent
    /// request that rotated the token first therefore makes the comparison
    /// fail on retry, and a stale or replayed token can never win the race.
    ///
    /// Returns the updated user on success, `None` if the presented token
    /// does not match the stored one.
    pub async fn rotate_refresh_token(
        &self,
        user_id: &str,
        presented: &str,
        replacement: &str,
        now: &str,
    ) -> Result<Option<User>, AppError> {
        let user_id = user_id.to_string();
        let presented = presented.to_string();
        let replacement = replacement.to_string();
        let now = now.to_string();

        self.get_client()?
            .run_transaction(|db, transaction| {
                let user_id = user_id.clone();
                let presented = presented.clone();
                let replacement = replacement.clone();
                let now = now.clone();
                async move {
                    let user: Option<User> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&user_id)
                        .await?;

                    let Some(mut user) = user else {
                        return Ok(None);
                    };

                    if !user.swap_refresh_token(&presented, &replacement, &now) {
                        tracing::warn!(user_id = %user.id, "Refresh token mismatch, rotation refused");
                        return Ok(None);
                    }

                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .document_id(&user.id)
                        .object(&user)
                        .add_to_transaction(transaction)?;

                    Ok(Some(user))
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Refresh token rotation failed: {}", e)))
    }

    // ─── Nutrition Log Operations ────────────────────────────────

    /// Get the nutrition log for a user and day, if one exists.
    ///
    /// Logs are keyed `{user_id}_{YYYY-MM-DD}` so each user has at most one
    /// document per day.
    pub async fn get_nutrition_log(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Option<NutritionLog>, AppError> {
        self.get_doc(collections::NUTRITION_LOGS, &NutritionLog::doc_id(user_id, date))
            .await
    }

    /// Find the log containing a meal, whatever day it was logged on.
    pub async fn find_nutrition_log_with_meal(
        &self,
        user_id: &str,
        meal_id: &str,
    ) -> Result<Option<NutritionLog>, AppError> {
        let logs: Vec<NutritionLog> = self
            .query_owned(collections::NUTRITION_LOGS, user_id)
            .await?;
        Ok(NutritionLog::containing_meal(logs, meal_id))
    }

    /// Store a nutrition log under its composite key.
    pub async fn set_nutrition_log(&self, log: &NutritionLog) -> Result<(), AppError> {
        self.set_doc(
            collections::NUTRITION_LOGS,
            &NutritionLog::doc_id(&log.user_id, &log.date),
            log,
        )
        .await
    }

    // ─── Activity Operations ─────────────────────────────────────

    /// Get an activity by ID, scoped to its owner.
    ///
    /// Returns `None` for both a missing document and one owned by another
    /// user, so callers surface a uniform 404.
    pub async fn get_activity(
        &self,
        user_id: &str,
        activity_id: &str,
    ) -> Result<Option<Activity>, AppError> {
        let activity: Option<Activity> =
            self.get_doc(collections::ACTIVITIES, activity_id).await?;
        Ok(activity.filter(|a| a.user_id == user_id))
    }

    /// List a user's activities with optional type filter and pagination.
    ///
    /// Returns `(activities, total_count)` where the count reflects the
    /// filter, not the page.
    pub async fn list_activities(
        &self,
        user_id: &str,
        activity_type: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<Activity>, u64), AppError> {
        let owner = user_id.to_string();
        let type_filter = activity_type.map(|t| t.to_string());

        let client = self.get_client()?;

        let build_query = || {
            let owner = owner.clone();
            let type_filter = type_filter.clone();
            client
                .fluent()
                .select()
                .from(collections::ACTIVITIES)
                .filter(move |q| {
                    let mut conditions = vec![q.field("user_id").eq(owner.clone())];
                    if let Some(t) = &type_filter {
                        conditions.push(q.field("type").eq(t.clone()));
                    }
                    q.for_all(conditions)
                })
        };

        let total = build_query()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .len() as u64;

        let activities = build_query()
            .order_by([(
                "completed_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(limit)
            .offset(offset)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((activities, total))
    }

    /// All of a user's activities completed within a date range (RFC3339
    /// bounds, inclusive start, exclusive end).
    pub async fn get_activities_in_range(
        &self,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<Activity>, AppError> {
        let owner = user_id.to_string();
        let start = start.to_string();
        let end = end.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(owner.clone()),
                    q.field("completed_at").greater_than_or_equal(start.clone()),
                    q.field("completed_at").less_than(end.clone()),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store an activity.
    pub async fn set_activity(&self, activity: &Activity) -> Result<(), AppError> {
        self.set_doc(collections::ACTIVITIES, &activity.id, activity)
            .await
    }

    /// Delete an activity.
    pub async fn delete_activity(&self, activity_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::ACTIVITIES, activity_id).await
    }

    // ─── Exercise Catalog Operations ─────────────────────────────

    /// Get a catalog exercise by ID.
    pub async fn get_exercise(&self, exercise_id: &str) -> Result<Option<Exercise>, AppError> {
        self.get_doc(collections::EXERCISES, exercise_id).await
    }

    /// List catalog exercises, optionally filtered by category.
    pub async fn list_exercises(&self, category: Option<&str>) -> Result<Vec<Exercise>, AppError> {
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::EXERCISES);

        let query = if let Some(category) = category {
            let category = category.to_string();
            query.filter(move |q| q.for_all([q.field("category").eq(category.clone())]))
        } else {
            query
        };

        query
            .order_by([("name", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Workout Plan Operations ─────────────────────────────────

    /// Get a workout plan by ID, scoped to its owner.
    pub async fn get_workout_plan(
        &self,
        user_id: &str,
        plan_id: &str,
    ) -> Result<Option<WorkoutPlan>, AppError> {
        let plan: Option<WorkoutPlan> =
            self.get_doc(collections::WORKOUT_PLANS, plan_id).await?;
        Ok(plan.filter(|p| p.user_id == user_id))
    }

    /// List a user's workout plans, newest first.
    pub async fn list_workout_plans(&self, user_id: &str) -> Result<Vec<WorkoutPlan>, AppError> {
        let owner = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUT_PLANS)
            .filter(move |q| q.for_all([q.field("user_id").eq(owner.clone())]))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a workout plan.
    pub async fn set_workout_plan(&self, plan: &WorkoutPlan) -> Result<(), AppError> {
        self.set_doc(collections::WORKOUT_PLANS, &plan.id, plan)
            .await
    }

    /// Delete a workout plan.
    pub async fn delete_workout_plan(&self, plan_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::WORKOUT_PLANS, plan_id).await
    }

    // ─── Workout Session Operations ──────────────────────────────

    /// Get a workout session by ID, scoped to its owner.
    pub async fn get_workout_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<WorkoutSession>, AppError> {
        let session: Option<WorkoutSession> = self
            .get_doc(collections::WORKOUT_SESSIONS, session_id)
            .await?;
        Ok(session.filter(|s| s.user_id == user_id))
    }

    /// List a user's workout sessions with pagination, newest first.
    /// Returns `(sessions, total_count)`.
    pub async fn list_workout_sessions(
        &self,
        user_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<WorkoutSession>, u64), AppError> {
        let total = self
            .count_for_user(collections::WORKOUT_SESSIONS, user_id)
            .await?;

        let owner = user_id.to_string();
        let sessions = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUT_SESSIONS)
            .filter(move |q| q.for_all([q.field("user_id").eq(owner.clone())]))
            .order_by([(
                "start_time",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(limit)
            .offset(offset)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((sessions, total))
    }

    /// The plan's currently running session, if any.
    pub async fn find_active_session(
        &self,
        user_id: &str,
        plan_id: &str,
    ) -> Result<Option<WorkoutSession>, AppError> {
        let owner = user_id.to_string();
        let plan_id = plan_id.to_string();
        let mut sessions: Vec<WorkoutSession> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUT_SESSIONS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(owner.clone()),
                    q.field("workout_plan_id").eq(plan_id.clone()),
                    q.field("status").eq("in-progress"),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(sessions.pop())
    }

    /// Store a workout session.
    pub async fn set_workout_session(&self, session: &WorkoutSession) -> Result<(), AppError> {
        self.set_doc(collections::WORKOUT_SESSIONS, &session.id, session)
            .await
    }

    // ─── Challenge Operations ────────────────────────────────────

    /// Get a challenge by ID.
    pub async fn get_challenge(&self, challenge_id: &str) -> Result<Option<Challenge>, AppError> {
        self.get_doc(collections::CHALLENGES, challenge_id).await
    }

    /// List active challenges, newest first.
    pub async fn list_active_challenges(&self) -> Result<Vec<Challenge>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::CHALLENGES)
            .filter(|q| q.for_all([q.field("is_active").eq(true)]))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a challenge.
    pub async fn set_challenge(&self, challenge: &Challenge) -> Result<(), AppError> {
        self.set_doc(collections::CHALLENGES, &challenge.id, challenge)
            .await
    }

    // ─── Achievement Operations ──────────────────────────────────

    /// List a user's achievements, newest first.
    pub async fn list_achievements(&self, user_id: &str) -> Result<Vec<Achievement>, AppError> {
        let owner = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACHIEVEMENTS)
            .filter(move |q| q.for_all([q.field("user_id").eq(owner.clone())]))
            .order_by([(
                "earned_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store an achievement.
    pub async fn set_achievement(&self, achievement: &Achievement) -> Result<(), AppError> {
        self.set_doc(collections::ACHIEVEMENTS, &achievement.id, achievement)
            .await
    }

    // ─── Friend Operations ───────────────────────────────────────

    /// Get a friend relation by the pair of user IDs.
    pub async fn get_friend(
        &self,
        user_id: &str,
        friend_id: &str,
    ) -> Result<Option<Friend>, AppError> {
        self.get_doc(collections::FRIENDS, &Friend::doc_id(user_id, friend_id))
            .await
    }

    /// List a user's friend relations.
    pub async fn list_friends(&self, user_id: &str) -> Result<Vec<Friend>, AppError> {
        let owner = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::FRIENDS)
            .filter(move |q| q.for_all([q.field("user_id").eq(owner.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a friend relation under its composite key.
    pub async fn set_friend(&self, friend: &Friend) -> Result<(), AppError> {
        self.set_doc(
            collections::FRIENDS,
            &Friend::doc_id(&friend.user_id, &friend.friend_id),
            friend,
        )
        .await
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    // ─── User Data Deletion (GDPR) ─────────────────────────────────

    /// Delete ALL data for a user.
    ///
    /// Deletes from all user-owned collections, then the user document
    /// itself. Returns the number of documents deleted.
    pub async fn delete_user_data(&self, user_id: &str) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        // 1. Nutrition logs
        let logs: Vec<NutritionLog> = self.query_owned(collections::NUTRITION_LOGS, user_id).await?;
        deleted_count += logs.len();
        self.batch_delete(&logs, collections::NUTRITION_LOGS, |log: &NutritionLog| {
            NutritionLog::doc_id(&log.user_id, &log.date)
        })
        .await?;

        // 2. Activities
        let activities: Vec<Activity> = self.query_owned(collections::ACTIVITIES, user_id).await?;
        deleted_count += activities.len();
        self.batch_delete(&activities, collections::ACTIVITIES, |a: &Activity| {
            a.id.clone()
        })
        .await?;

        // 3. Workout plans and sessions
        let plans: Vec<WorkoutPlan> = self.query_owned(collections::WORKOUT_PLANS, user_id).await?;
        deleted_count += plans.len();
        self.batch_delete(&plans, collections::WORKOUT_PLANS, |p: &WorkoutPlan| {
            p.id.clone()
        })
        .await?;

        let sessions: Vec<WorkoutSession> = self
            .query_owned(collections::WORKOUT_SESSIONS, user_id)
            .await?;
        deleted_count += sessions.len();
        self.batch_delete(
            &sessions,
            collections::WORKOUT_SESSIONS,
            |s: &WorkoutSession| s.id.clone(),
        )
        .await?;

        // 4. Achievements and friend relations
        let achievements: Vec<Achievement> =
            self.query_owned(collections::ACHIEVEMENTS, user_id).await?;
        deleted_count += achievements.len();
        self.batch_delete(&achievements, collections::ACHIEVEMENTS, |a: &Achievement| {
            a.id.clone()
        })
        .await?;

        let friends: Vec<Friend> = self.query_owned(collections::FRIENDS, user_id).await?;
        deleted_count += friends.len();
        self.batch_delete(&friends, collections::FRIENDS, |f: &Friend| {
            Friend::doc_id(&f.user_id, &f.friend_id)
        })
        .await?;

        // 5. User document
        self.delete_doc(collections::USERS, user_id).await?;
        deleted_count += 1;

        tracing::info!(user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }

    /// All documents in a collection owned by a user.
    async fn query_owned<T: DeserializeOwned + Send>(
        &self,
        collection: &str,
        user_id: &str,
    ) -> Result<Vec<T>, AppError> {
        let owner = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.for_all([q.field("user_id").eq(owner.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
