use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};

use crate::auth::{jwt_auth_middleware, AuthService, AuthenticatedUser};
use crate::models::{ProfileResponse, ProfileUpsertRequest};
use crate::services::{PlanError, ProfileService};

/// Profile routes, all authenticated
pub fn profile_routes(profile_service: ProfileService, auth_service: AuthService) -> Router {
    Router::new()
        .route("/", get(get_profile).post(upsert_profile))
        .route_layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(profile_service)
}

/// Fetch the caller's profile
#[tracing::instrument(skip(profile_service))]
async fn get_profile(
    State(profile_service): State<ProfileService>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ProfileResponse>, PlanError> {
    let profile = profile_service.get_profile(user.id).await?;
    Ok(Json(profile))
}

/// Create or update the caller's profile
#[tracing::instrument(skip(profile_service, request))]
async fn upsert_profile(
    State(profile_service): State<ProfileService>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ProfileUpsertRequest>,
) -> Result<Json<ProfileResponse>, PlanError> {
    let profile = profile_service.upsert_profile(user.id, request).await?;
    Ok(Json(profile))
}
