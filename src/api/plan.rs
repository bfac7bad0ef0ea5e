use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use crate::auth::{jwt_auth_middleware, AuthService, AuthenticatedUser};
use crate::models::PlanResponse;
use crate::services::{PlanError, PlanService};

/// Plan routes, all authenticated
pub fn plan_routes(plan_service: PlanService, auth_service: AuthService) -> Router {
    Router::new()
        .route("/", get(get_plan).post(save_plan))
        .route("/generate", post(generate_plan))
        .route_layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(plan_service)
}

/// Fetch the caller's current plan, if one exists
#[tracing::instrument(skip(plan_service))]
async fn get_plan(
    State(plan_service): State<PlanService>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<PlanResponse>, PlanError> {
    let plan = plan_service.get_plan(user.id).await?;
    Ok(Json(plan))
}

/// Generate a fresh plan from the caller's profile and persist it.
///
/// Long-running: the agent runtime can take minutes to produce a
/// structured plan. Any pipeline failure is reported with its kind; the
/// previously stored plan is left untouched on failure.
#[tracing::instrument(skip(plan_service))]
async fn generate_plan(
    State(plan_service): State<PlanService>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<PlanResponse>, PlanError> {
    let plan = plan_service.generate_plan(user.id).await?;
    Ok(Json(plan))
}

/// Save an accepted (possibly client-edited) plan, replacing the old one
#[tracing::instrument(skip(plan_service, plan))]
async fn save_plan(
    State(plan_service): State<PlanService>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(plan): Json<PlanResponse>,
) -> Result<Json<PlanResponse>, PlanError> {
    let plan = plan_service.save_plan(user.id, plan).await?;
    Ok(Json(plan))
}
