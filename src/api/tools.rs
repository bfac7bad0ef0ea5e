use axum::{extract::Json, routing::post, Router};
use serde::{Deserialize, Serialize};

use crate::services::health_calculations::{
    calculate_bmi, calculate_bmr, calculate_macros, calculate_tdee, BmiResult,
};
use crate::services::PlanError;

/// Calculator endpoints.
///
/// The same formulas the agent runtime uses as tools, exposed for the
/// frontend to preview metrics before generating a plan. Unauthenticated:
/// nothing here reads or writes user state.
pub fn tools_routes() -> Router {
    Router::new()
        .route("/bmi", post(bmi_endpoint))
        .route("/bmr", post(bmr_endpoint))
        .route("/tdee", post(tdee_endpoint))
        .route("/macros", post(macros_endpoint))
}

const ACTIVITY_LEVELS: [&str; 5] = ["sedentary", "light", "moderate", "active", "very_active"];
const GOALS: [&str; 4] = ["lose_weight", "gain_weight", "maintain", "other"];

#[derive(Debug, Deserialize)]
struct BmiRequest {
    weight_lbs: f64,
    height_feet: i32,
    height_inches: f64,
}

#[derive(Debug, Deserialize)]
struct BmrRequest {
    weight_lbs: f64,
    height_feet: i32,
    height_inches: f64,
    age: i32,
    gender: String,
}

#[derive(Debug, Serialize)]
struct BmrResponse {
    bmr: i64,
}

#[derive(Debug, Deserialize)]
struct TdeeRequest {
    bmr: i64,
    activity_level: String,
}

#[derive(Debug, Serialize)]
struct TdeeResponse {
    tdee: f64,
}

#[derive(Debug, Deserialize)]
struct MacrosRequest {
    tdee: f64,
    goal: String,
    weight_lbs: f64,
}

#[derive(Debug, Serialize)]
struct MacrosResponse {
    protein: f64,
    carbs: f64,
    fat: f64,
    protein_calories: f64,
    carbs_calories: f64,
    fat_calories: f64,
    total_calories: f64,
    protein_percentage: f64,
    carb_percentage: f64,
    fat_percentage: f64,
}

async fn bmi_endpoint(Json(request): Json<BmiRequest>) -> Result<Json<BmiResult>, PlanError> {
    Ok(Json(calculate_bmi(
        request.weight_lbs,
        request.height_feet,
        request.height_inches,
    )))
}

async fn bmr_endpoint(Json(request): Json<BmrRequest>) -> Result<Json<BmrResponse>, PlanError> {
    let gender = request.gender.to_lowercase();
    if !["male", "female", "other"].contains(&gender.as_str()) {
        return Err(PlanError::InvalidInput(
            "gender must be male, female, or other".to_string(),
        ));
    }

    let bmr = calculate_bmr(
        request.weight_lbs,
        request.height_feet,
        request.height_inches,
        request.age,
        &gender,
    );
    Ok(Json(BmrResponse { bmr }))
}

async fn tdee_endpoint(Json(request): Json<TdeeRequest>) -> Result<Json<TdeeResponse>, PlanError> {
    if !ACTIVITY_LEVELS.contains(&request.activity_level.as_str()) {
        return Err(PlanError::InvalidInput(format!(
            "activity_level must be one of {ACTIVITY_LEVELS:?}"
        )));
    }

    let tdee = calculate_tdee(request.bmr, &request.activity_level);
    Ok(Json(TdeeResponse { tdee }))
}

async fn macros_endpoint(
    Json(request): Json<MacrosRequest>,
) -> Result<Json<MacrosResponse>, PlanError> {
    if !GOALS.contains(&request.goal.as_str()) {
        return Err(PlanError::InvalidInput(format!(
            "goal must be one of {GOALS:?}"
        )));
    }

    let macros = calculate_macros(request.tdee, &request.goal, request.weight_lbs);
    Ok(Json(MacrosResponse {
        protein: macros.protein_g as f64,
        carbs: macros.carbs_g as f64,
        fat: macros.fat_g as f64,
        protein_calories: macros.protein_calories as f64,
        carbs_calories: macros.carbs_calories as f64,
        fat_calories: macros.fat_calories as f64,
        total_calories: macros.total_calories as f64,
        protein_percentage: macros.protein_percentage as f64,
        carb_percentage: macros.carb_percentage as f64,
        fat_percentage: macros.fat_percentage as f64,
    }))
}
