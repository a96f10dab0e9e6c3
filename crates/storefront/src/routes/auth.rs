//! Authentication route handlers.
//!
//! Password accounts are local to the storefront; Shopify customers are
//! only linked at checkout.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{ActivityKind, CurrentUser, User};
use crate::routes::record_activity;
use crate::services::auth::{AuthService, ProfileInput};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(flatten)]
    pub profile: ProfileInput,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Answer of the session polling endpoint.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: Option<CurrentUser>,
}

impl From<Option<CurrentUser>> for SessionResponse {
    fn from(user: Option<CurrentUser>) -> Self {
        Self {
            authenticated: user.is_some(),
            user,
        }
    }
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
    };
    set_current_user(session, &current).await?;
    set_sentry_user(&user.id);
    Ok(())
}

/// Create an account and sign it in.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>)> {
    if body.password != body.password_confirm {
        return Err(AppError::BadRequest("Passwords do not match".to_string()));
    }

    let user = AuthService::new(state.pool())
        .register_with_password(&body.email, &body.password, &body.profile)
        .await?;

    start_session(&session, &user).await?;
    record_activity(&state, &headers, user.id, ActivityKind::Register, None).await;
    info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Sign in with email and password.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<Json<User>> {
    let user = AuthService::new(state.pool())
        .login_with_password(&body.email, &body.password)
        .await?;

    start_session(&session, &user).await?;
    record_activity(&state, &headers, user.id, ActivityKind::Login, None).await;

    Ok(Json(user))
}

/// Sign out. The session cart is kept.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    OptionalAuth(user): OptionalAuth,
) -> Result<StatusCode> {
    if let Some(user) = user {
        record_activity(&state, &headers, user.id, ActivityKind::Logout, None).await;
    }

    clear_current_user(&session).await?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

/// Whether the session is signed in.
pub async fn session(OptionalAuth(user): OptionalAuth) -> Json<SessionResponse> {
    Json(user.into())
}
