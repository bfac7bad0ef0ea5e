use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{ProfileResponse, ProfileUpsertRequest, UserProfile};
use crate::services::errors::PlanError;

/// Profile storage, one row per user
#[derive(Clone)]
pub struct ProfileService {
    db: PgPool,
}

impl ProfileService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create or update the user's profile in one statement.
    pub async fn upsert_profile(
        &self,
        user_id: Uuid,
        request: ProfileUpsertRequest,
    ) -> Result<ProfileResponse, PlanError> {
        request.validate().map_err(PlanError::InvalidInput)?;

        let profile = sqlx::query_as::<_, UserProfile>(
            "INSERT INTO user_profiles (
                id, user_id, age, weight_lbs, height_feet, height_inches, gender,
                fitness_goal, activity_level, workout_days_per_week,
                workout_duration_minutes, available_equipment, dietary_preferences,
                updated_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW())
             ON CONFLICT (user_id) DO UPDATE SET
                age = EXCLUDED.age,
                weight_lbs = EXCLUDED.weight_lbs,
                height_feet = EXCLUDED.height_feet,
                height_inches = EXCLUDED.height_inches,
                gender = EXCLUDED.gender,
                fitness_goal = EXCLUDED.fitness_goal,
                activity_level = EXCLUDED.activity_level,
                workout_days_per_week = EXCLUDED.workout_days_per_week,
                workout_duration_minutes = EXCLUDED.workout_duration_minutes,
                available_equipment = EXCLUDED.available_equipment,
                dietary_preferences = EXCLUDED.dietary_preferences,
                updated_at = NOW()
             RETURNING id, user_id, age, weight_lbs, height_feet, height_inches, gender,
                       fitness_goal, activity_level, workout_days_per_week,
                       workout_duration_minutes, available_equipment, dietary_preferences,
                       updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(request.age)
        .bind(request.weight_lbs)
        .bind(request.height_feet)
        .bind(request.height_inches)
        .bind(&request.gender)
        .bind(&request.fitness_goal)
        .bind(&request.activity_level)
        .bind(request.workout_days_per_week)
        .bind(request.workout_duration_minutes)
        .bind(Json(&request.available_equipment))
        .bind(Json(&request.dietary_preferences))
        .fetch_one(&self.db)
        .await?;

        Ok(profile.into())
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<ProfileResponse, PlanError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT id, user_id, age, weight_lbs, height_feet, height_inches, gender,
                    fitness_goal, activity_level, workout_days_per_week,
                    workout_duration_minutes, available_equipment, dietary_preferences,
                    updated_at
             FROM user_profiles
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        profile
            .map(ProfileResponse::from)
            .ok_or(PlanError::ProfileNotFound)
    }
}
