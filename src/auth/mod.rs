// Authentication: JWT tokens, password hashing, request middleware

pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod service;

pub use errors::AuthError;
pub use jwt::{extract_bearer_token, JwtService};
pub use middleware::jwt_auth_middleware;
pub use models::{AuthenticatedUser, Claims, LoginRequest, RegisterRequest, TokenResponse};
pub use service::AuthService;
