use std::collections::HashMap;
use std::sync::Arc;

use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::models::{PlanResponse, PlanRow, UserProfile};
use crate::services::agent_client::AgentClient;
use crate::services::errors::PlanError;
use crate::services::{plan_assembler, response_decoder};

/// Per-user generation locks.
///
/// Entries are created on demand and evicted once the last handle for a
/// user is released, so the map only holds users with a generation in
/// flight rather than every user ever seen.
#[derive(Clone, Default)]
struct UserLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    async fn acquire(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.inner.lock().await;
        locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Hand back a handle obtained from `acquire`. The entry is removed
    /// when no other task still holds one.
    async fn release(&self, user_id: Uuid, lock: Arc<Mutex<()>>) {
        drop(lock);
        let mut locks = self.inner.lock().await;
        if let Some(entry) = locks.get(&user_id) {
            if Arc::strong_count(entry) == 1 {
                locks.remove(&user_id);
            }
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

/// Plan generation and storage.
///
/// One plan row per user: a successful generation replaces the previous
/// plan wholesale via a single-statement upsert, and a per-user lock
/// serializes concurrent generation attempts so two in-flight requests
/// cannot interleave. A failed generation leaves the stored plan untouched.
#[derive(Clone)]
pub struct PlanService {
    db: PgPool,
    agent: AgentClient,
    generation_locks: UserLocks,
}

impl PlanService {
    pub fn new(db: PgPool, agent: AgentClient) -> Self {
        Self {
            db,
            agent,
            generation_locks: UserLocks::default(),
        }
    }

    /// Fetch the user's current plan
    pub async fn get_plan(&self, user_id: Uuid) -> Result<PlanResponse, PlanError> {
        let row = sqlx::query_as::<_, PlanRow>(
            "SELECT id, user_id, workout_plan, meal_plan, health_metrics, tips, created_at
             FROM fitness_plans
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        row.map(PlanResponse::from).ok_or(PlanError::PlanNotFound)
    }

    /// Run the full generation pipeline for one user and persist the result.
    pub async fn generate_plan(&self, user_id: Uuid) -> Result<PlanResponse, PlanError> {
        let lock = self.generation_locks.acquire(user_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.run_generation(user_id).await
        };
        self.generation_locks.release(user_id, lock).await;
        result
    }

    async fn run_generation(&self, user_id: Uuid) -> Result<PlanResponse, PlanError> {
        let profile = self.get_profile(user_id).await?;

        let raw = self.agent.invoke(user_id, &profile).await?;
        let decoded = response_decoder::decode(raw)?;
        let document = response_decoder::unwrap_envelope(decoded);
        let plan = plan_assembler::assemble(document)?;

        self.store_plan(user_id, &plan).await?;
        info!(%user_id, "stored newly generated plan");

        Ok(plan)
    }

    /// Persist a plan the user accepted (possibly edited client-side),
    /// replacing any existing one.
    pub async fn save_plan(
        &self,
        user_id: Uuid,
        plan: PlanResponse,
    ) -> Result<PlanResponse, PlanError> {
        self.store_plan(user_id, &plan).await?;
        Ok(plan)
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<UserProfile, PlanError> {
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

        profile.ok_or(PlanError::ProfileNotFound)
    }

    /// Atomic replace keyed by user identity. The UNIQUE(user_id)
    /// constraint plus ON CONFLICT makes delete-then-insert unnecessary
    /// and leaves exactly one row no matter how calls interleave.
    async fn store_plan(&self, user_id: Uuid, plan: &PlanResponse) -> Result<(), PlanError> {
        sqlx::query(
            "INSERT INTO fitness_plans (id, user_id, workout_plan, meal_plan, health_metrics, tips, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, NOW())
             ON CONFLICT (user_id) DO UPDATE SET
                workout_plan = EXCLUDED.workout_plan,
                meal_plan = EXCLUDED.meal_plan,
                health_metrics = EXCLUDED.health_metrics,
                tips = EXCLUDED.tips,
                created_at = EXCLUDED.created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(Json(&plan.workout_plan))
        .bind(Json(&plan.meal_plan))
        .bind(Json(&plan.health_metrics))
        .bind(Json(&plan.tips))
        .execute(&self.db)
        .await?;

        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lock_entry_is_evicted_after_release() {
        let locks = UserLocks::default();
        let user_id = Uuid::new_v4();

        let handle = locks.acquire(user_id).await;
        {
            let _guard = handle.lock().await;
            assert_eq!(locks.len().await, 1);
        }

        locks.release(user_id, handle).await;
        assert_eq!(locks.len().await, 0);
    }

    #[tokio::test]
    async fn lock_entry_survives_while_another_holder_remains() {
        let locks = UserLocks::default();
        let user_id = Uuid::new_v4();

        let first = locks.acquire(user_id).await;
        let second = locks.acquire(user_id).await;
        assert!(Arc::ptr_eq(&first, &second));

        locks.release(user_id, first).await;
        assert_eq!(locks.len().await, 1);

        locks.release(user_id, second).await;
        assert_eq!(locks.len().await, 0);
    }
}
