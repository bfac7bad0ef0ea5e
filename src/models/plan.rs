use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use uuid::Uuid;

/// Wire-format plan schema.
///
/// These types mirror the JSON shape the structuring prompt demands from
/// the model. Generative output is loose about numerics, so every numeric
/// field accepts either a real number or a numeric string; anything else
/// is a schema violation surfaced by the assembler. Serialization always
/// emits all seven weekday keys, null meaning a rest day.

/// Deserializers tolerant of numbers arriving as numeric strings.
mod coerce {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;
    use serde_json::Value;

    fn f64_from(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(v) => f64_from(&v)
                .map(Some)
                .ok_or_else(|| Error::custom(format!("expected a number, got {v}"))),
        }
    }

    pub fn opt_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(v) => f64_from(&v)
                .map(|f| f as i32)
                .map(Some)
                .ok_or_else(|| Error::custom(format!("expected an integer, got {v}"))),
        }
    }

    pub fn i32_required<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
        let v = Value::deserialize(d)?;
        f64_from(&v)
            .map(|f| f as i32)
            .ok_or_else(|| Error::custom(format!("expected an integer, got {v}")))
    }

    /// Reps come back as "8-12", "10", or a bare number depending on the
    /// model's mood; normalize all of them to a string.
    pub fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match Value::deserialize(d)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            v => Err(Error::custom(format!("expected a string or number, got {v}"))),
        }
    }
}

/// Daily macro targets inside the health metrics block
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MacroTargets {
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub protein_g: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub carbs_g: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub fat_g: Option<f64>,
}

/// Computed physiological metrics echoed back by the model.
///
/// The known fields are typed; anything extra the model adds (health
/// assessments, category labels) rides along in `extra` so the stored
/// document stays faithful to what was generated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HealthMetrics {
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub bmi: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub bmr: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub tdee: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub target_calories: Option<f64>,
    #[serde(default)]
    pub macro_targets: Option<MacroTargets>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    #[serde(deserialize_with = "coerce::i32_required")]
    pub sets: i32,
    #[serde(deserialize_with = "coerce::string_or_number")]
    pub reps: String,
    #[serde(default, deserialize_with = "coerce::opt_i32")]
    pub rest_seconds: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayWorkout {
    pub workout_type: String,
    pub exercises: Vec<Exercise>,
    #[serde(default, deserialize_with = "coerce::opt_i32")]
    pub duration_minutes: Option<i32>,
}

/// One week of workouts keyed by lowercase weekday. A null day is a rest
/// day; all seven keys are always present in the serialized form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkoutPlan {
    #[serde(default)]
    pub monday: Option<DayWorkout>,
    #[serde(default)]
    pub tuesday: Option<DayWorkout>,
    #[serde(default)]
    pub wednesday: Option<DayWorkout>,
    #[serde(default)]
    pub thursday: Option<DayWorkout>,
    #[serde(default)]
    pub friday: Option<DayWorkout>,
    #[serde(default)]
    pub saturday: Option<DayWorkout>,
    #[serde(default)]
    pub sunday: Option<DayWorkout>,
    #[serde(default)]
    pub weekly_summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    pub name: String,
    #[serde(default, deserialize_with = "coerce::opt_i32")]
    pub calories: Option<i32>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub protein_g: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub carbs_g: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub fat_g: Option<f64>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub preparation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DayMeals {
    #[serde(default)]
    pub breakfast: Option<Meal>,
    #[serde(default)]
    pub lunch: Option<Meal>,
    #[serde(default)]
    pub dinner: Option<Meal>,
    #[serde(default)]
    pub snacks: Option<Vec<Meal>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MealPlan {
    #[serde(default)]
    pub day_meal: Option<DayMeals>,
    #[serde(default)]
    pub weekly_summary: Option<String>,
    #[serde(default)]
    pub daily_targets: Option<Value>,
}

/// The persisted/returned plan aggregate
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanResponse {
    #[serde(default)]
    pub health_metrics: HealthMetrics,
    #[serde(default)]
    pub workout_plan: WorkoutPlan,
    #[serde(default)]
    pub meal_plan: MealPlan,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Stored plan row, one per user
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_plan: Json<WorkoutPlan>,
    pub meal_plan: Json<MealPlan>,
    pub health_metrics: Json<HealthMetrics>,
    pub tips: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl From<PlanRow> for PlanResponse {
    fn from(row: PlanRow) -> Self {
        Self {
            health_metrics: row.health_metrics.0,
            workout_plan: row.workout_plan.0,
            meal_plan: row.meal_plan.0,
            tips: row.tips.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn workout_plan_serializes_all_seven_days() {
        let plan = WorkoutPlan::default();
        let value = serde_json::to_value(&plan).unwrap();
        let obj = value.as_object().unwrap();
        for day in [
            "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
        ] {
            assert!(obj.contains_key(day), "missing day key: {day}");
            assert!(obj[day].is_null());
        }
    }

    #[test]
    fn exercise_coerces_numeric_strings() {
        let exercise: Exercise = serde_json::from_value(json!({
            "name": "Goblet Squat",
            "sets": "4",
            "reps": 12,
            "rest_seconds": "60"
        }))
        .unwrap();
        assert_eq!(exercise.sets, 4);
        assert_eq!(exercise.reps, "12");
        assert_eq!(exercise.rest_seconds, Some(60));
    }

    #[test]
    fn exercise_without_name_is_rejected() {
        let result: Result<Exercise, _> =
            serde_json::from_value(json!({"sets": 3, "reps": "10"}));
        assert!(result.is_err());
    }

    #[test]
    fn meal_coerces_macro_strings() {
        let meal: Meal = serde_json::from_value(json!({
            "name": "Oatmeal",
            "calories": "420",
            "protein_g": "18.5",
            "carbs_g": 62,
            "fat_g": 11.0
        }))
        .unwrap();
        assert_eq!(meal.calories, Some(420));
        assert_eq!(meal.protein_g, Some(18.5));
    }

    #[test]
    fn meal_with_non_numeric_calories_is_rejected() {
        let result: Result<Meal, _> =
            serde_json::from_value(json!({"name": "Soup", "calories": "a lot"}));
        assert!(result.is_err());
    }

    #[test]
    fn health_metrics_preserves_unknown_fields() {
        let metrics: HealthMetrics = serde_json::from_value(json!({
            "bmi": 24.1,
            "bmr": 1700,
            "health_assessment": "within normal range"
        }))
        .unwrap();
        assert_eq!(metrics.bmi, Some(24.1));
        assert_eq!(
            metrics.extra.get("health_assessment"),
            Some(&json!("within normal range"))
        );
    }
}
