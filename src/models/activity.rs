// SPDX-License-Identifier: MIT

//! Activity model for storage and API.

use serde::{Deserialize, Serialize};

pub const ACTIVITY_TYPES: &[&str] = &[
    "workout", "walk", "run", "cycle", "swim", "yoga", "hiking", "other",
];

/// Heart rate summary for an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartRate {
    pub average: Option<f64>,
    pub max: Option<f64>,
}

/// GPS track attached to an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpsData {
    /// [longitude, latitude] pairs
    pub coordinates: Vec<[f64; 2]>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    /// meters
    pub elevation: Option<f64>,
}

/// Exercise entry within a logged activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityExercise {
    pub name: String,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    /// seconds
    pub rest_time: Option<u32>,
    pub notes: Option<String>,
}

/// Stored activity record in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Document ID (uuid)
    pub id: String,
    /// Owner
    pub user_id: String,
    /// Activity type (workout, walk, run, ...)
    #[serde(rename = "type")]
    pub activity_type: String,
    pub name: String,
    /// minutes
    pub duration: f64,
    #[serde(default)]
    pub calories_burned: f64,
    /// km
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub steps: u64,
    pub heart_rate: Option<HeartRate>,
    pub gps_data: Option<GpsData>,
    #[serde(default)]
    pub exercises: Vec<ActivityExercise>,
    /// When the activity was completed (RFC3339)
    pub completed_at: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Aggregate stats over a set of activities, reduced in memory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityStats {
    pub total_activities: u64,
    pub total_duration: f64,
    pub total_calories: f64,
    pub total_distance: f64,
    pub total_steps: u64,
    pub avg_duration: f64,
    /// Activity count per type
    pub by_type: std::collections::HashMap<String, u64>,
}

impl ActivityStats {
    pub fn from_activities(activities: &[Activity]) -> Self {
        let mut stats = Self::default();
        for activity in activities {
            stats.total_activities += 1;
            stats.total_duration += activity.duration;
            stats.total_calories += activity.calories_burned;
            stats.total_distance += activity.distance;
            stats.total_steps += activity.steps;
            *stats
                .by_type
                .entry(activity.activity_type.clone())
                .or_insert(0) += 1;
        }
        if stats.total_activities > 0 {
            stats.avg_duration = stats.total_duration / stats.total_activities as f64;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_activity(activity_type: &str, duration: f64, calories: f64) -> Activity {
        Activity {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "u1".to_string(),
            activity_type: activity_type.to_string(),
            name: "Test".to_string(),
            duration,
            calories_burned: calories,
            distance: 0.0,
            steps: 0,
            heart_rate: None,
            gps_data: None,
            exercises: Vec::new(),
            completed_at: "2024-03-05T10:00:00Z".to_string(),
            created_at: "2024-03-05T10:00:00Z".to_string(),
            updated_at: "2024-03-05T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_stats_reduce() {
        let activities = vec![
            make_activity("run", 30.0, 300.0),
            make_activity("run", 40.0, 400.0),
            make_activity("yoga", 60.0, 150.0),
        ];

        let stats = ActivityStats::from_activities(&activities);
        assert_eq!(stats.total_activities, 3);
        assert_eq!(stats.total_duration, 130.0);
        assert_eq!(stats.total_calories, 850.0);
        assert!((stats.avg_duration - 130.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(stats.by_type.get("run"), Some(&2));
        assert_eq!(stats.by_type.get("yoga"), Some(&1));
    }
}
