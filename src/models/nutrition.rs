// SPDX-License-Identifier: MIT

//! Daily nutrition log: one document per user per calendar day.
//!
//! Daily totals are derived on read by reducing over the day's meals;
//! only the per-meal `total_calories` is denormalized.

use serde::{Deserialize, Serialize};

/// Meal slot within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// Macronutrients in grams.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Macros {
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
}

/// A single food entry within a meal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub calories: f64,
    #[serde(default)]
    pub macros: Macros,
}

/// A logged meal with its food list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    /// Meal ID within the log (uuid)
    pub id: String,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub foods: Vec<Food>,
    /// Denormalized sum of the foods' calories
    pub total_calories: f64,
    /// When the meal was eaten (RFC3339)
    pub timing: String,
}

impl Meal {
    /// Recompute `total_calories` from the food list.
    pub fn recompute_total_calories(&mut self) {
        self.total_calories = self.foods.iter().map(|f| f.calories).sum();
    }
}

/// Per-day nutrition goals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyGoals {
    pub calories: f64,
    /// grams
    pub protein: f64,
    /// grams
    pub carbs: f64,
    /// grams
    pub fat: f64,
    /// ml
    pub water: f64,
}

impl Default for DailyGoals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 150.0,
            carbs: 250.0,
            fat: 67.0,
            water: 2000.0,
        }
    }
}

/// Derived daily totals (never persisted).
#[derive(Debug, Clone, Default, Serialize)]
pub struct DailyTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub water: f64,
}

/// Nutrition log document stored in Firestore.
///
/// Document ID is `{user_id}_{date}`, so there is exactly one log per
/// user per day by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionLog {
    pub user_id: String,
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub meals: Vec<Meal>,
    /// Running total in ml
    #[serde(default)]
    pub water_intake: f64,
    #[serde(default)]
    pub daily_goals: DailyGoals,
    pub created_at: String,
    pub updated_at: String,
}

impl NutritionLog {
    /// Create an empty log for a day.
    pub fn empty(user_id: &str, date: &str, now: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            date: date.to_string(),
            meals: Vec::new(),
            water_intake: 0.0,
            daily_goals: DailyGoals::default(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    /// Document ID for a (user, day) pair.
    pub fn doc_id(user_id: &str, date: &str) -> String {
        format!("{}_{}", user_id, date)
    }

    /// Reduce the day's meals into derived totals.
    ///
    /// Calories come from the denormalized per-meal sums; macros from the
    /// individual foods; water from the running total.
    pub fn daily_totals(&self) -> DailyTotals {
        let mut totals = DailyTotals {
            water: self.water_intake,
            ..DailyTotals::default()
        };
        for meal in &self.meals {
            totals.calories += meal.total_calories;
            for food in &meal.foods {
                totals.protein += food.macros.protein;
                totals.carbs += food.macros.carbs;
                totals.fat += food.macros.fat;
                totals.fiber += food.macros.fiber;
            }
        }
        totals
    }

    /// Find a meal by ID.
    pub fn meal(&self, meal_id: &str) -> Option<&Meal> {
        self.meals.iter().find(|m| m.id == meal_id)
    }

    /// Pick the log that holds a meal out of a set of logs.
    ///
    /// Meal IDs are uuids, unique across days, so a meal can be located
    /// without knowing which day it was logged on.
    pub fn containing_meal(logs: Vec<NutritionLog>, meal_id: &str) -> Option<NutritionLog> {
        logs.into_iter().find(|log| log.meal(meal_id).is_some())
    }

    /// Find a meal by ID, mutably.
    pub fn meal_mut(&mut self, meal_id: &str) -> Option<&mut Meal> {
        self.meals.iter_mut().find(|m| m.id == meal_id)
    }

    /// Remove a meal by ID. Returns `true` if it was present.
    pub fn remove_meal(&mut self, meal_id: &str) -> bool {
        let before = self.meals.len();
        self.meals.retain(|m| m.id != meal_id);
        self.meals.len() != before
    }

    /// Percentage of the daily water goal reached, rounded.
    pub fn water_percentage(&self) -> u32 {
        if self.daily_goals.water <= 0.0 {
            return 0;
        }
        ((self.water_intake / self.daily_goals.water) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_food(calories: f64, protein: f64) -> Food {
        Food {
            name: "food".to_string(),
            quantity: 1.0,
            unit: "piece".to_string(),
            calories,
            macros: Macros {
                protein,
                carbs: 0.0,
                fat: 0.0,
                fiber: 0.0,
            },
        }
    }

    fn make_meal(id: &str, foods: Vec<Food>) -> Meal {
        let mut meal = Meal {
            id: id.to_string(),
            meal_type: MealType::Breakfast,
            foods,
            total_calories: 0.0,
            timing: "2024-03-05T08:00:00Z".to_string(),
        };
        meal.recompute_total_calories();
        meal
    }

    #[test]
    fn test_meal_addition_recomputes_totals() {
        let mut log = NutritionLog::empty("u1", "2024-03-05", "2024-03-05T08:00:00Z");
        assert_eq!(log.daily_totals().calories, 0.0);

        let meal = make_meal("m1", vec![make_food(100.0, 5.0), make_food(50.0, 2.0)]);
        assert_eq!(meal.total_calories, 150.0);

        log.meals.push(meal);
        let totals = log.daily_totals();
        assert_eq!(totals.calories, 150.0);
        assert_eq!(totals.protein, 7.0);

        assert!(log.remove_meal("m1"));
        assert_eq!(log.daily_totals().calories, 0.0);
    }

    #[test]
    fn test_meal_found_across_days() {
        let mut monday = NutritionLog::empty("u1", "2024-03-04", "2024-03-04T08:00:00Z");
        monday.meals.push(make_meal("m1", vec![make_food(100.0, 5.0)]));
        let tuesday = NutritionLog::empty("u1", "2024-03-05", "2024-03-05T08:00:00Z");

        // A meal logged on an earlier day is still found
        let found =
            NutritionLog::containing_meal(vec![tuesday.clone(), monday], "m1").unwrap();
        assert_eq!(found.date, "2024-03-04");

        assert!(NutritionLog::containing_meal(vec![tuesday], "m1").is_none());
    }

    #[test]
    fn test_remove_missing_meal() {
        let mut log = NutritionLog::empty("u1", "2024-03-05", "2024-03-05T08:00:00Z");
        assert!(!log.remove_meal("nope"));
    }

    #[test]
    fn test_water_percentage_rounds() {
        let mut log = NutritionLog::empty("u1", "2024-03-05", "2024-03-05T08:00:00Z");
        for _ in 0..3 {
            log.water_intake += 250.0;
        }
        assert_eq!(log.water_intake, 750.0);
        // 750 / 2000 = 37.5% -> rounds to 38
        assert_eq!(log.water_percentage(), 38);
    }

    #[test]
    fn test_water_included_in_totals() {
        let mut log = NutritionLog::empty("u1", "2024-03-05", "2024-03-05T08:00:00Z");
        log.water_intake = 500.0;
        assert_eq!(log.daily_totals().water, 500.0);
    }

    #[test]
    fn test_doc_id_is_per_user_per_day() {
        assert_eq!(
            NutritionLog::doc_id("u1", "2024-03-05"),
            "u1_2024-03-05"
        );
        assert_ne!(
            NutritionLog::doc_id("u1", "2024-03-05"),
            NutritionLog::doc_id("u2", "2024-03-05")
        );
    }
}
