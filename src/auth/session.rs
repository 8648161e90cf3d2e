//! Cookie-based identity. The bracket core never sees cookies; this module
//! turns a request into a `User` plus an admin flag and nothing more.

use crate::api_error::ApiError;
use crate::db::DbPool;
use crate::models::User;
use actix_web::HttpRequest;
use tracing::{debug, info};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "username";

pub struct SessionService {
    db_pool: DbPool,
    admin_username: String,
}

impl SessionService {
    pub fn new(db_pool: DbPool, admin_username: String) -> Self {
        Self {
            db_pool,
            admin_username,
        }
    }

    /// Username login: finds or creates the user. The uniqueness constraint
    /// makes concurrent identical logins converge on one row.
    pub async fn login(&self, username: &str) -> Result<User, ApiError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::bad_request("Username is required"));
        }

        sqlx::query(
            "INSERT INTO users (id, username) VALUES ($1, $2) \
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .execute(&self.db_pool)
        .await?;

        let user = self.user_by_username(username).await?;
        info!(username, user_id = %user.id, "Session established");
        Ok(user)
    }

    pub async fn user_by_username(&self, username: &str) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, bracket_submitted, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(ApiError::NotFound)
    }

    /// Resolves the caller from the session cookie.
    pub async fn current_user(&self, req: &HttpRequest) -> Result<User, ApiError> {
        let cookie = req.cookie(SESSION_COOKIE).ok_or(ApiError::Unauthorized)?;
        match self.user_by_username(cookie.value()).await {
            Ok(user) => Ok(user),
            Err(ApiError::NotFound) => {
                debug!("Session cookie names an unknown user");
                Err(ApiError::Unauthorized)
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_admin(&self, username: &str) -> bool {
        username.eq_ignore_ascii_case(&self.admin_username)
    }

    /// Like `current_user`, but the caller must be the configured admin.
    pub async fn require_admin(&self, req: &HttpRequest) -> Result<User, ApiError> {
        let user = self.current_user(req).await?;
        if !self.is_admin(&user.username) {
            return Err(ApiError::Forbidden);
        }
        Ok(user)
    }
}
