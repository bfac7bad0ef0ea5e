use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use crate::auth::{
    jwt_auth_middleware, AuthError, AuthService, AuthenticatedUser, LoginRequest, RegisterRequest,
    TokenResponse,
};
use crate::models::UserInfo;

/// Authentication routes
pub fn auth_routes(auth_service: AuthService) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route(
            "/me",
            get(me).route_layer(middleware::from_fn_with_state(
                auth_service.clone(),
                jwt_auth_middleware,
            )),
        )
        .with_state(auth_service)
}

/// Register a new user, issuing a token for auto-login
#[tracing::instrument(skip(auth_service, request))]
async fn register(
    State(auth_service): State<AuthService>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AuthError> {
    let response = auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with username and password
#[tracing::instrument(skip(auth_service, request))]
async fn login(
    State(auth_service): State<AuthService>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let response = auth_service.login(request).await?;
    Ok(Json(response))
}

/// Current account info - requires authentication
#[tracing::instrument(skip(auth_service))]
async fn me(
    State(auth_service): State<AuthService>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserInfo>, AuthError> {
    let user = auth_service
        .get_user_by_id(user.id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(UserInfo::from(&user)))
}
