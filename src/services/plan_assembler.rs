//! Coerces a decoded agent response into the strict plan schema.
//!
//! Generous on the way in, strict on the way out: absent weekday keys
//! become rest days, absent optional blocks become their defaults, numeric
//! strings become numbers. Anything that still does not fit the shape is a
//! schema violation reported to the caller, not papered over with an empty
//! plan.

use serde_json::Value;

use crate::models::PlanResponse;
use crate::services::errors::PlanError;

pub fn assemble(decoded: Value) -> Result<PlanResponse, PlanError> {
    if !decoded.is_object() {
        return Err(PlanError::SchemaViolation(format!(
            "expected a plan object, got {}",
            value_kind(&decoded)
        )));
    }

    serde_json::from_value(decoded).map_err(|e| PlanError::SchemaViolation(e.to_string()))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn missing_day_keys_become_rest_days() {
        let plan = assemble(json!({
            "workout_plan": {
                "monday": {
                    "workout_type": "Upper Body",
                    "exercises": [{"name": "Push-up", "sets": 3, "reps": "12"}]
                },
                "weekly_summary": "Two strength days"
            }
        }))
        .unwrap();

        assert!(plan.workout_plan.monday.is_some());
        assert!(plan.workout_plan.tuesday.is_none());
        assert!(plan.workout_plan.sunday.is_none());

        // All seven keys survive serialization even when null.
        let serialized = serde_json::to_value(&plan.workout_plan).unwrap();
        assert_eq!(serialized.as_object().unwrap().len(), 8); // 7 days + summary
        assert!(serialized["wednesday"].is_null());
    }

    #[test]
    fn absent_blocks_default() {
        let plan = assemble(json!({})).unwrap();
        assert_eq!(plan.tips, Vec::<String>::new());
        assert!(plan.meal_plan.day_meal.is_none());
        assert!(plan.health_metrics.bmi.is_none());
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let plan = assemble(json!({
            "health_metrics": {"bmi": "24.3", "bmr": "1700"},
            "meal_plan": {
                "day_meal": {
                    "breakfast": {"name": "Eggs", "calories": "380", "protein_g": "24"}
                }
            }
        }))
        .unwrap();

        assert_eq!(plan.health_metrics.bmi, Some(24.3));
        let breakfast = plan.meal_plan.day_meal.unwrap().breakfast.unwrap();
        assert_eq!(breakfast.calories, Some(380));
        assert_eq!(breakfast.protein_g, Some(24.0));
    }

    #[test]
    fn exercise_without_name_is_a_schema_violation() {
        let result = assemble(json!({
            "workout_plan": {
                "friday": {
                    "workout_type": "Cardio",
                    "exercises": [{"sets": 3, "reps": "10"}]
                }
            }
        }));
        assert!(matches!(result, Err(PlanError::SchemaViolation(_))));
    }

    #[test]
    fn non_object_document_is_a_schema_violation() {
        let result = assemble(json!("just some motivational text"));
        assert!(matches!(result, Err(PlanError::SchemaViolation(_))));
    }
}
