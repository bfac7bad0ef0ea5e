use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::{extract_bearer_token, AuthError, AuthService};

/// JWT authentication middleware.
///
/// Validates the bearer token and inserts an [`AuthenticatedUser`] into
/// request extensions for handlers to pick up.
///
/// [`AuthenticatedUser`]: crate::auth::AuthenticatedUser
pub async fn jwt_auth_middleware(
    State(auth_service): State<AuthService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = extract_bearer_token(auth_header)?;
    let user = auth_service.authenticate(token).await?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
