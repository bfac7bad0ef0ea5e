use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::types::Json;
use uuid::Uuid;

/// Stored fitness profile, one row per user.
///
/// All measurement fields are nullable: the profile is filled in
/// incrementally from the frontend and the prompt builder renders missing
/// values as an explicit "Not provided" sentinel.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub age: Option<i32>,
    pub weight_lbs: Option<f64>,
    pub height_feet: Option<i32>,
    pub height_inches: Option<f64>,
    pub gender: Option<String>,
    pub fitness_goal: Option<String>,
    pub activity_level: Option<String>,
    pub workout_days_per_week: Option<i32>,
    pub workout_duration_minutes: Option<i32>,
    pub available_equipment: Json<Vec<String>>,
    pub dietary_preferences: Json<Vec<String>>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Render the profile as the `user_profile` document sent to the agent
    /// runtime. Optional scheduling fields fall back to the same defaults
    /// the analysis prompt advertises.
    pub fn agent_document(&self) -> serde_json::Value {
        json!({
            "age": self.age,
            "weight_lbs": self.weight_lbs,
            "height_feet": self.height_feet,
            "height_inches": self.height_inches.unwrap_or(0.0),
            "gender": self.gender,
            "fitness_goal": self.fitness_goal,
            "activity_level": self.activity_level.as_deref().unwrap_or("moderate"),
            "workout_days_per_week": self.workout_days_per_week.unwrap_or(3),
            "workout_duration_minutes": self.workout_duration_minutes.unwrap_or(45),
            "available_equipment": self.available_equipment.0,
            "dietary_preferences": self.dietary_preferences.0,
        })
    }
}

/// Create-or-update request for a profile
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpsertRequest {
    pub age: Option<i32>,
    pub weight_lbs: Option<f64>,
    pub height_feet: Option<i32>,
    pub height_inches: Option<f64>,
    pub gender: Option<String>,
    pub fitness_goal: Option<String>,
    pub activity_level: Option<String>,
    pub workout_days_per_week: Option<i32>,
    pub workout_duration_minutes: Option<i32>,
    #[serde(default)]
    pub available_equipment: Vec<String>,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
}

impl ProfileUpsertRequest {
    /// Range-check every provided field. Absent fields pass; the pipeline
    /// handles missing data with sentinels.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(age) = self.age {
            if !(13..=120).contains(&age) {
                return Err("age must be between 13 and 120".to_string());
            }
        }
        if let Some(weight) = self.weight_lbs {
            if weight <= 0.0 || weight > 1000.0 {
                return Err("weight_lbs must be greater than 0 and at most 1000".to_string());
            }
        }
        if let Some(feet) = self.height_feet {
            if !(3..=8).contains(&feet) {
                return Err("height_feet must be between 3 and 8".to_string());
            }
        }
        if let Some(inches) = self.height_inches {
            if !(0.0..12.0).contains(&inches) {
                return Err("height_inches must be at least 0 and less than 12".to_string());
            }
        }
        if let Some(days) = self.workout_days_per_week {
            if !(1..=7).contains(&days) {
                return Err("workout_days_per_week must be between 1 and 7".to_string());
            }
        }
        if let Some(minutes) = self.workout_duration_minutes {
            if !(15..=180).contains(&minutes) {
                return Err("workout_duration_minutes must be between 15 and 180".to_string());
            }
        }
        Ok(())
    }
}

/// Profile as returned to the frontend
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub age: Option<i32>,
    pub weight_lbs: Option<f64>,
    pub height_feet: Option<i32>,
    pub height_inches: Option<f64>,
    pub gender: Option<String>,
    pub fitness_goal: Option<String>,
    pub activity_level: Option<String>,
    pub workout_days_per_week: Option<i32>,
    pub workout_duration_minutes: Option<i32>,
    pub available_equipment: Vec<String>,
    pub dietary_preferences: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            age: p.age,
            weight_lbs: p.weight_lbs,
            height_feet: p.height_feet,
            height_inches: p.height_inches,
            gender: p.gender,
            fitness_goal: p.fitness_goal,
            activity_level: p.activity_level,
            workout_days_per_week: p.workout_days_per_week,
            workout_duration_minutes: p.workout_duration_minutes,
            available_equipment: p.available_equipment.0,
            dietary_preferences: p.dietary_preferences.0,
            updated_at: p.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> ProfileUpsertRequest {
        ProfileUpsertRequest {
            age: Some(30),
            weight_lbs: Some(170.0),
            height_feet: Some(5),
            height_inches: Some(9.0),
            gender: Some("male".to_string()),
            fitness_goal: Some("lose_weight".to_string()),
            activity_level: Some("moderate".to_string()),
            workout_days_per_week: Some(4),
            workout_duration_minutes: Some(45),
            available_equipment: vec!["dumbbells".to_string()],
            dietary_preferences: vec![],
        }
    }

    #[test]
    fn accepts_in_range_profile() {
        assert!(base_request().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let mut req = base_request();
        req.age = Some(12);
        assert!(req.validate().is_err());

        let mut req = base_request();
        req.weight_lbs = Some(0.0);
        assert!(req.validate().is_err());

        let mut req = base_request();
        req.height_inches = Some(12.0);
        assert!(req.validate().is_err());

        let mut req = base_request();
        req.workout_days_per_week = Some(8);
        assert!(req.validate().is_err());
    }

    #[test]
    fn accepts_sparse_profile() {
        let req = ProfileUpsertRequest {
            age: None,
            weight_lbs: None,
            height_feet: None,
            height_inches: None,
            gender: None,
            fitness_goal: None,
            activity_level: None,
            workout_days_per_week: None,
            workout_duration_minutes: None,
            available_equipment: vec![],
            dietary_preferences: vec![],
        };
        assert!(req.validate().is_ok());
    }
}
