// SPDX-License-Identifier: MIT

//! Persisted document models.

pub mod activity;
pub mod nutrition;
pub mod social;
pub mod user;
pub mod workout;

pub use activity::Activity;
pub use nutrition::NutritionLog;
pub use social::{Achievement, Challenge, Friend};
pub use user::User;
pub use workout::{Exercise, WorkoutPlan, WorkoutSession};
