//! Axum route handlers for registration, login and the current user.

use axum::{extract::State, http::StatusCode, Form, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{find_user_by_email, normalize_email, CurrentUser};
use crate::errors::AppError;
use crate::models::user::{Role, UserPublic, UserRow};
use crate::state::AppState;

const MIN_PASSWORD_LENGTH: usize = 6;
const LOGIN_ERROR: &str = "Incorrect email or password";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub role: Role,
}

/// OAuth2 password-flow form. `grant_type`, `scope` and client fields are ignored.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// POST /auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserPublic>), AppError> {
    let email = normalize_email(&req.email)
        .ok_or_else(|| AppError::Validation("A valid email address is required".to_string()))?;
    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if find_user_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Validation("User already exists".to_string()));
    }

    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing task failed: {e}")))?;

    let full_name = req
        .full_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let inserted = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, email, password_hash, full_name, role, is_active)
        VALUES ($1, $2, $3, $4, $5, TRUE)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(&password_hash)
    .bind(&full_name)
    .bind(req.role.as_str())
    .fetch_one(&state.db)
    .await;

    let user = match inserted {
        Ok(user) => user,
        // Lost a race with a concurrent registration for the same email.
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(AppError::Validation("User already exists".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    info!("Registered user {} as {}", user.id, user.role);
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = normalize_email(&form.username)
        .ok_or_else(|| AppError::Validation(LOGIN_ERROR.to_string()))?;

    let user = find_user_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::Validation(LOGIN_ERROR.to_string()))?;

    let password = form.password;
    let stored = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password verification task failed: {e}")))?;
    if !verified {
        return Err(AppError::Validation(LOGIN_ERROR.to_string()));
    }

    let access_token = state
        .tokens
        .create_access_token(&user.email, Role::from_db(&user.role), None)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign access token: {e}")))?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

/// GET /auth/me
pub async fn handle_me(CurrentUser(user): CurrentUser) -> Json<UserPublic> {
    Json(user)
}
