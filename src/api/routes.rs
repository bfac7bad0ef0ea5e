use anyhow::Result;
use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::auth_routes;
use super::health::health_check;
use super::plan::plan_routes;
use super::profile::profile_routes;
use super::tools::tools_routes;
use crate::auth::AuthService;
use crate::config::AgentConfig;
use crate::services::{AgentClient, PlanService, ProfileService};

pub fn create_routes(db: PgPool, jwt_secret: &str, agent_config: AgentConfig) -> Result<Router> {
    let auth_service = AuthService::new(db.clone(), jwt_secret);
    let profile_service = ProfileService::new(db.clone());
    let agent_client = AgentClient::new(agent_config)?;
    let plan_service = PlanService::new(db, agent_client);

    Ok(Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes(auth_service.clone()))
        .nest(
            "/api/profile",
            profile_routes(profile_service, auth_service.clone()),
        )
        .nest("/api/plan", plan_routes(plan_service, auth_service))
        .nest("/api/tools", tools_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer()))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
