// SPDX-License-Identifier: MIT

//! Social features: challenges, achievements, friends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Challenge target (metric, value, unit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeTarget {
    /// steps, calories, workouts, distance, duration, count
    pub metric: String,
    pub value: f64,
    pub unit: String,
}

/// A user's participation in a challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: String,
    pub joined_at: String,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub completed: bool,
    pub last_updated: String,
}

/// Challenge document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    /// Document ID (uuid)
    pub id: String,
    pub name: String,
    pub description: String,
    /// individual or group
    #[serde(rename = "type")]
    pub challenge_type: String,
    pub category: String,
    pub target: ChallengeTarget,
    /// RFC3339
    pub start_date: String,
    /// RFC3339
    pub end_date: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// None means unlimited
    pub max_participants: Option<u32>,
    pub created_by: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

fn default_difficulty() -> String {
    "medium".to_string()
}

fn default_true() -> bool {
    true
}

impl Challenge {
    pub fn participant(&self, user_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    fn has_ended(&self, now: DateTime<Utc>) -> bool {
        DateTime::parse_from_rfc3339(&self.end_date)
            .map(|end| now >= end.with_timezone(&Utc))
            .unwrap_or(true)
    }

    fn is_full(&self) -> bool {
        self.max_participants
            .map(|max| self.participants.len() as u32 >= max)
            .unwrap_or(false)
    }

    /// Whether a user can join: active, not ended, not full, not already in.
    pub fn can_join(&self, user_id: &str, now: DateTime<Utc>) -> bool {
        self.is_active
            && !self.has_ended(now)
            && !self.is_full()
            && self.participant(user_id).is_none()
    }

    /// Participants ranked by progress, descending.
    pub fn leaderboard(&self) -> Vec<&Participant> {
        let mut ranked: Vec<&Participant> = self.participants.iter().collect();
        ranked.sort_by(|a, b| {
            b.progress
                .partial_cmp(&a.progress)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}

/// Achievement progress; percentage is clamped to 100.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AchievementProgress {
    #[serde(default)]
    pub current: f64,
    pub target: f64,
    #[serde(default)]
    pub percentage: u32,
}

impl AchievementProgress {
    /// Recompute the percentage from current/target.
    pub fn recompute(&mut self) {
        if self.target > 0.0 {
            self.percentage = (((self.current / self.target) * 100.0).round() as u32).min(100);
        }
    }
}

/// Achievement document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    /// Document ID (uuid)
    pub id: String,
    pub user_id: String,
    /// badge, milestone, trophy, streak
    #[serde(rename = "type")]
    pub achievement_type: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub earned_at: String,
    pub progress: AchievementProgress,
    pub challenge_id: Option<String>,
    #[serde(default = "default_rarity")]
    pub rarity: String,
    #[serde(default)]
    pub points: u32,
}

fn default_rarity() -> String {
    "common".to_string()
}

/// Friend status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    Pending,
    Accepted,
    Blocked,
}

/// Friend relation document.
///
/// Document ID is `{user_id}_{friend_id}`, so a pair is unique by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friend {
    pub user_id: String,
    pub friend_id: String,
    pub status: FriendStatus,
    pub requested_by: String,
    pub accepted_at: Option<String>,
    pub created_at: String,
}

impl Friend {
    pub fn doc_id(user_id: &str, friend_id: &str) -> String {
        format!("{}_{}", user_id, friend_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_challenge(end_date: &str, max: Option<u32>) -> Challenge {
        Challenge {
            id: "c1".to_string(),
            name: "10k steps".to_string(),
            description: "Walk 10k steps a day".to_string(),
            challenge_type: "individual".to_string(),
            category: "steps".to_string(),
            target: ChallengeTarget {
                metric: "steps".to_string(),
                value: 10000.0,
                unit: "steps".to_string(),
            },
            start_date: "2024-03-01T00:00:00Z".to_string(),
            end_date: end_date.to_string(),
            participants: Vec::new(),
            max_participants: max,
            created_by: "u1".to_string(),
            difficulty: "medium".to_string(),
            is_active: true,
            created_at: "2024-03-01T00:00:00Z".to_string(),
            updated_at: "2024-03-01T00:00:00Z".to_string(),
        }
    }

    fn join(challenge: &mut Challenge, user_id: &str, progress: f64) {
        challenge.participants.push(Participant {
            user_id: user_id.to_string(),
            joined_at: "2024-03-02T00:00:00Z".to_string(),
            progress,
            completed: false,
            last_updated: "2024-03-02T00:00:00Z".to_string(),
        });
    }

    #[test]
    fn test_can_join_checks() {
        let now = DateTime::parse_from_rfc3339("2024-03-10T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let mut challenge = make_challenge("2099-01-01T00:00:00Z", Some(2));
        assert!(challenge.can_join("u2", now));

        // Already joined
        join(&mut challenge, "u2", 0.0);
        assert!(!challenge.can_join("u2", now));

        // Full
        join(&mut challenge, "u3", 0.0);
        assert!(!challenge.can_join("u4", now));

        // Ended
        let ended = make_challenge("2024-01-01T00:00:00Z", None);
        assert!(!ended.can_join("u2", now));

        // Inactive
        let mut inactive = make_challenge("2099-01-01T00:00:00Z", None);
        inactive.is_active = false;
        assert!(!inactive.can_join("u2", now));
    }

    #[test]
    fn test_leaderboard_sorted_by_progress() {
        let mut challenge = make_challenge("2099-01-01T00:00:00Z", None);
        join(&mut challenge, "a", 10.0);
        join(&mut challenge, "b", 30.0);
        join(&mut challenge, "c", 20.0);

        let ranked: Vec<&str> = challenge
            .leaderboard()
            .iter()
            .map(|p| p.user_id.as_str())
            .collect();
        assert_eq!(ranked, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_achievement_percentage_clamped() {
        let mut progress = AchievementProgress {
            current: 5.0,
            target: 10.0,
            percentage: 0,
        };
        progress.recompute();
        assert_eq!(progress.percentage, 50);

        progress.current = 25.0;
        progress.recompute();
        assert_eq!(progress.percentage, 100);
    }
}
