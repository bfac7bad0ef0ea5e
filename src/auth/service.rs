use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{
    AuthError, AuthenticatedUser, Claims, JwtService, LoginRequest, RegisterRequest, TokenResponse,
};
use crate::models::User;

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    db: PgPool,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_secret: &str) -> Self {
        Self {
            jwt_service: JwtService::new(jwt_secret),
            db,
        }
    }

    /// Register a new user and issue a token right away so the frontend
    /// can log them in without a second round trip.
    pub async fn register(&self, request: RegisterRequest) -> Result<TokenResponse, AuthError> {
        if self.get_user_by_username(&request.username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, password_hash, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&request.username)
        .bind(&password_hash)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await
        .map_err(AuthError::Database)?;

        self.issue_token(&user)
    }

    /// Verify credentials and issue an access token
    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse, AuthError> {
        let user = self
            .get_user_by_username(&request.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !bcrypt::verify(&request.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_token(&user)
    }

    /// Validate a token and resolve the account it belongs to
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.jwt_service.validate_token(token)?;
        let user_id = parse_subject(&claims)?;

        let user = self
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(AuthenticatedUser {
            id: user.id,
            username: user.username,
        })
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    fn issue_token(&self, user: &User) -> Result<TokenResponse, AuthError> {
        let access_token = self
            .jwt_service
            .create_access_token(user.id, &user.username)?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.expires_in_seconds(),
        })
    }
}

fn parse_subject(claims: &Claims) -> Result<Uuid, AuthError> {
    Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)
}
