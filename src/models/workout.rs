// SPDX-License-Identifier: MIT

//! Workout catalog, plans, and sessions.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Catalog exercise (shared across users).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Document ID (uuid)
    pub id: String,
    pub name: String,
    /// strength, cardio, flexibility, balance, sports
    pub category: String,
    #[serde(default)]
    pub target_muscles: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    pub difficulty: String,
    pub description: String,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub calories_per_minute: f64,
    pub created_at: String,
}

/// Exercise reference within a plan's day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanExercise {
    pub exercise_id: String,
    pub sets: u32,
    pub reps: Option<u32>,
    /// seconds, for time-based exercises
    pub duration: Option<u32>,
    pub weight: Option<f64>,
    /// seconds
    #[serde(default = "default_rest_time")]
    pub rest_time: u32,
    pub notes: Option<String>,
}

fn default_rest_time() -> u32 {
    60
}

/// One weekday's workout within a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub day: String,
    pub exercises: Vec<PlanExercise>,
}

/// Workout plan document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Document ID (uuid)
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: String,
    /// weeks
    pub duration: u32,
    #[serde(default)]
    pub schedule: Vec<WorkoutDay>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

fn default_true() -> bool {
    true
}

/// All exercise IDs referenced by a schedule, deduplicated.
pub fn schedule_exercise_ids(schedule: &[WorkoutDay]) -> HashSet<String> {
    schedule
        .iter()
        .flat_map(|day| day.exercises.iter().map(|e| e.exercise_id.clone()))
        .collect()
}

impl WorkoutPlan {
    /// Find the schedule entry for a weekday.
    pub fn day_workout(&self, day: &str) -> Option<&WorkoutDay> {
        let day = day.to_lowercase();
        self.schedule.iter().find(|w| w.day == day)
    }
}

/// Session lifecycle. Only `in-progress` sessions may be closed, and a
/// closed session stays closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl SessionStatus {
    /// Validated transitions: `in-progress -> completed | cancelled`.
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::InProgress, SessionStatus::Completed)
                | (SessionStatus::InProgress, SessionStatus::Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in-progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

/// One set within a session exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSet {
    pub set_number: u32,
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub weight: f64,
    /// seconds
    pub duration: Option<u32>,
    #[serde(default)]
    pub completed: bool,
}

/// Per-exercise log within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExercise {
    pub exercise_id: String,
    pub sets: Vec<SessionSet>,
}

/// Workout session document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Document ID (uuid)
    pub id: String,
    pub user_id: String,
    pub workout_plan_id: String,
    pub day: String,
    /// RFC3339
    pub start_time: String,
    pub end_time: Option<String>,
    /// minutes
    #[serde(default)]
    pub total_duration: f64,
    #[serde(default)]
    pub exercises: Vec<SessionExercise>,
    pub status: SessionStatus,
    #[serde(default)]
    pub calories_burned: f64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(SessionStatus::InProgress.can_transition_to(SessionStatus::Completed));
        assert!(SessionStatus::InProgress.can_transition_to(SessionStatus::Cancelled));
    }

    #[test]
    fn test_closed_sessions_stay_closed() {
        assert!(!SessionStatus::Completed.can_transition_to(SessionStatus::InProgress));
        assert!(!SessionStatus::Completed.can_transition_to(SessionStatus::Cancelled));
        assert!(!SessionStatus::Cancelled.can_transition_to(SessionStatus::Completed));
        assert!(!SessionStatus::InProgress.can_transition_to(SessionStatus::InProgress));
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let parsed: SessionStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, SessionStatus::Completed);
    }

    #[test]
    fn test_schedule_exercise_ids_deduplicated() {
        let plan = WorkoutPlan {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            name: "Plan".to_string(),
            description: String::new(),
            difficulty: "beginner".to_string(),
            duration: 4,
            schedule: vec![
                WorkoutDay {
                    day: "monday".to_string(),
                    exercises: vec![PlanExercise {
                        exercise_id: "e1".to_string(),
                        sets: 3,
                        reps: Some(10),
                        duration: None,
                        weight: None,
                        rest_time: 60,
                        notes: None,
                    }],
                },
                WorkoutDay {
                    day: "wednesday".to_string(),
                    exercises: vec![PlanExercise {
                        exercise_id: "e2".to_string(),
                        sets: 4,
                        reps: Some(8),
                        duration: None,
                        weight: Some(40.0),
                        rest_time: 90,
                        notes: None,
                    }],
                },
            ],
            goals: Vec::new(),
            is_active: true,
            created_at: "2024-03-05T10:00:00Z".to_string(),
            updated_at: "2024-03-05T10:00:00Z".to_string(),
        };

        let ids = schedule_exercise_ids(&plan.schedule);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("e1") && ids.contains("e2"));
        assert!(plan.day_workout("Monday").is_some());
        assert!(plan.day_workout("friday").is_none());
    }
}
