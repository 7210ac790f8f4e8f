// SPDX-License-Identifier: MIT

//! Daily nutrition log routes.
//!
//! A user has exactly one log per calendar day; handlers find-or-create the
//! day's document and mutate it in place.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::nutrition::{DailyTotals, Food, Meal, MealType, NutritionLog};
use crate::response::ApiResponse;
use crate::time_utils::{day_key, now_rfc3339, parse_day_key};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/daily", get(get_daily_log))
        .route("/meals", post(add_meal))
        .route("/meals/{meal_id}", put(update_meal).delete(delete_meal))
        .route("/water", post(add_water))
        .route("/foods/search", get(search_foods))
        .route("/plans", get(diet_plans))
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// `YYYY-MM-DD` or RFC3339; defaults to today.
    pub date: Option<String>,
}

/// Normalize an optional date parameter to a `YYYY-MM-DD` key.
fn resolve_day(date: Option<&str>) -> Result<String> {
    match date {
        Some(raw) => parse_day_key(raw)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid date '{}'", raw))),
        None => Ok(day_key(chrono::Utc::now())),
    }
}

/// Fetch the day's log, creating an empty one if none exists yet.
///
/// The deterministic doc id makes this idempotent: two concurrent creates
/// land on the same document.
async fn find_or_create_daily_log(
    state: &AppState,
    user_id: &str,
    date: &str,
) -> Result<NutritionLog> {
    if let Some(log) = state.db.get_nutrition_log(user_id, date).await? {
        return Ok(log);
    }

    let log = NutritionLog::empty(user_id, date, &now_rfc3339());
    state.db.set_nutrition_log(&log).await?;
    Ok(log)
}

/// Locate the log holding a meal.
///
/// An explicit `date` narrows the lookup to that day; without one the
/// meal is searched across all of the user's logs, so callers do not need
/// to remember which day a meal was logged on.
async fn locate_meal_log(
    state: &AppState,
    user_id: &str,
    meal_id: &str,
    date: Option<&str>,
) -> Result<NutritionLog> {
    let log = match date {
        Some(raw) => {
            let day = parse_day_key(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Invalid date '{}'", raw)))?;
            state.db.get_nutrition_log(user_id, &day).await?
        }
        None => {
            state
                .db
                .find_nutrition_log_with_meal(user_id, meal_id)
                .await?
        }
    };
    log.filter(|log| log.meal(meal_id).is_some())
        .ok_or_else(|| AppError::NotFound("Meal not found".to_string()))
}

/// Log plus its derived totals, as returned by most handlers.
#[derive(Serialize)]
pub struct DailyLogView {
    #[serde(flatten)]
    pub log: NutritionLog,
    pub daily_totals: DailyTotals,
}

impl DailyLogView {
    fn new(log: NutritionLog) -> Self {
        let daily_totals = log.daily_totals();
        Self { log, daily_totals }
    }
}

/// GET /api/nutrition/daily?date=
async fn get_daily_log(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<DateQuery>,
) -> Result<Json<ApiResponse<DailyLogView>>> {
    let date = resolve_day(query.date.as_deref())?;
    let log = find_or_create_daily_log(&state, &auth.user_id, &date).await?;
    Ok(Json(ApiResponse::data(DailyLogView::new(log))))
}

#[derive(Debug, Deserialize, Validate)]
pub struct MealRequest {
    #[serde(rename = "type")]
    pub meal_type: MealType,
    #[validate(length(min = 1, message = "must contain at least one food"))]
    pub foods: Vec<Food>,
    /// When the meal was eaten (RFC3339); defaults to now.
    pub timing: Option<String>,
    /// Which day to log against; defaults to today.
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct MealView {
    pub meal: Meal,
    pub daily_totals: DailyTotals,
}

/// POST /api/nutrition/meals
async fn add_meal(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<MealRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MealView>>)> {
    body.validate()?;

    let date = resolve_day(body.date.as_deref())?;
    let mut log = find_or_create_daily_log(&state, &auth.user_id, &date).await?;

    let mut meal = Meal {
        id: uuid::Uuid::new_v4().to_string(),
        meal_type: body.meal_type,
        foods: body.foods,
        total_calories: 0.0,
        timing: body.timing.unwrap_or_else(now_rfc3339),
    };
    meal.recompute_total_calories();

    log.meals.push(meal.clone());
    log.updated_at = now_rfc3339();
    state.db.set_nutrition_log(&log).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(MealView {
            meal,
            daily_totals: log.daily_totals(),
        })),
    ))
}

/// PUT /api/nutrition/meals/{meal_id}?date=
async fn update_meal(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(meal_id): Path<String>,
    Query(query): Query<DateQuery>,
    Json(body): Json<MealRequest>,
) -> Result<Json<ApiResponse<MealView>>> {
    body.validate()?;

    let mut log =
        locate_meal_log(&state, &auth.user_id, &meal_id, query.date.as_deref()).await?;
    let Some(meal) = log.meal_mut(&meal_id) else {
        return Err(AppError::NotFound("Meal not found".to_string()));
    };

    meal.meal_type = body.meal_type;
    meal.foods = body.foods;
    if let Some(timing) = body.timing {
        meal.timing = timing;
    }
    meal.recompute_total_calories();
    let updated = meal.clone();

    log.updated_at = now_rfc3339();
    state.db.set_nutrition_log(&log).await?;

    Ok(Json(ApiResponse::data(MealView {
        meal: updated,
        daily_totals: log.daily_totals(),
    })))
}

/// DELETE /api/nutrition/meals/{meal_id}?date=
async fn delete_meal(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(meal_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> Result<Json<ApiResponse<DailyLogView>>> {
    let mut log =
        locate_meal_log(&state, &auth.user_id, &meal_id, query.date.as_deref()).await?;
    if !log.remove_meal(&meal_id) {
        return Err(AppError::NotFound("Meal not found".to_string()));
    }

    log.updated_at = now_rfc3339();
    state.db.set_nutrition_log(&log).await?;

    Ok(Json(ApiResponse::data(DailyLogView::new(log))))
}

#[derive(Debug, Deserialize)]
pub struct WaterRequest {
    /// ml
    pub amount: f64,
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct WaterView {
    /// Running total in ml
    pub total: f64,
    /// Daily goal in ml
    pub goal: f64,
    /// round(total / goal * 100)
    pub percentage_complete: u32,
}

/// POST /api/nutrition/water
async fn add_water(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<WaterRequest>,
) -> Result<Json<ApiResponse<WaterView>>> {
    if body.amount <= 0.0 {
        return Err(AppError::BadRequest(
            "Water amount must be positive".to_string(),
        ));
    }

    let date = resolve_day(body.date.as_deref())?;
    let mut log = find_or_create_daily_log(&state, &auth.user_id, &date).await?;

    log.water_intake += body.amount;
    log.updated_at = now_rfc3339();
    state.db.set_nutrition_log(&log).await?;

    Ok(Json(ApiResponse::data(WaterView {
        total: log.water_intake,
        goal: log.daily_goals.water,
        percentage_complete: log.water_percentage(),
    })))
}

#[derive(Debug, Deserialize)]
pub struct FoodSearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize, Clone)]
pub struct CatalogFood {
    pub name: String,
    /// per 100 g
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Small built-in food database for the search endpoint.
fn food_catalog() -> Vec<CatalogFood> {
    [
        ("Chicken breast", 165.0, 31.0, 0.0, 3.6),
        ("Brown rice", 112.0, 2.6, 24.0, 0.9),
        ("Broccoli", 34.0, 2.8, 7.0, 0.4),
        ("Salmon", 208.0, 20.0, 0.0, 13.0),
        ("Oatmeal", 68.0, 2.4, 12.0, 1.4),
        ("Banana", 89.0, 1.1, 23.0, 0.3),
        ("Eggs", 155.0, 13.0, 1.1, 11.0),
        ("Greek yogurt", 59.0, 10.0, 3.6, 0.4),
        ("Almonds", 579.0, 21.0, 22.0, 50.0),
        ("Sweet potato", 86.0, 1.6, 20.0, 0.1),
    ]
    .iter()
    .map(|(name, calories, protein, carbs, fat)| CatalogFood {
        name: name.to_string(),
        calories: *calories,
        protein: *protein,
        carbs: *carbs,
        fat: *fat,
    })
    .collect()
}

/// GET /api/nutrition/foods/search?q=
async fn search_foods(
    Query(query): Query<FoodSearchQuery>,
) -> Json<ApiResponse<Vec<CatalogFood>>> {
    let needle = query.q.to_lowercase();
    let foods = food_catalog()
        .into_iter()
        .filter(|food| needle.is_empty() || food.name.to_lowercase().contains(&needle))
        .collect();
    Json(ApiResponse::data(foods))
}

#[derive(Serialize)]
pub struct DietPlan {
    pub name: String,
    pub description: String,
    pub daily_calories: f64,
    pub macros: PlanMacros,
}

#[derive(Serialize)]
pub struct PlanMacros {
    /// percent of calories
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

/// GET /api/nutrition/plans
async fn diet_plans() -> Json<ApiResponse<Vec<DietPlan>>> {
    Json(ApiResponse::data(vec![
        DietPlan {
            name: "Balanced".to_string(),
            description: "Even macro split for general health".to_string(),
            daily_calories: 2000.0,
            macros: PlanMacros {
                protein: 30,
                carbs: 40,
                fat: 30,
            },
        },
        DietPlan {
            name: "High protein".to_string(),
            description: "Muscle building and recovery".to_string(),
            daily_calories: 2200.0,
            macros: PlanMacros {
                protein: 40,
                carbs: 35,
                fat: 25,
            },
        },
        DietPlan {
            name: "Low carb".to_string(),
            description: "Reduced carbohydrate intake".to_string(),
            daily_calories: 1800.0,
            macros: PlanMacros {
                protein: 35,
                carbs: 20,
                fat: 45,
            },
        },
    ]))
}
