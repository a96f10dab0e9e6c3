//! Account route handlers (require auth).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use jolananas_core::AddressId;

use crate::db::{ActivityRepository, AddressRepository};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, cart_id};
use crate::models::{ActivityEntry, ActivityKind, Address, AddressInput, CurrentUser, User};
use crate::routes::record_activity;
use crate::services::auth::{AuthService, ProfileInput};
use crate::services::dashboard::{Dashboard, DashboardService};
use crate::state::AppState;

/// Activity entries returned when no limit is given.
const DEFAULT_ACTIVITY_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

async fn load_user(state: &AppState, current: &CurrentUser) -> Result<User> {
    Ok(AuthService::new(state.pool()).get_user(current.id).await?)
}

/// Dashboard: profile, addresses, activity, cart and orders.
#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Dashboard>> {
    let user = load_user(&state, &current).await?;
    let cart_id = cart_id(&session).await;

    let dashboard = DashboardService::new(state.pool(), state.storefront(), state.admin())
        .build(&user, cart_id.as_deref())
        .await?;

    Ok(Json(dashboard))
}

/// Update names and phone.
#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    RequireAuth(current): RequireAuth,
    Json(body): Json<ProfileInput>,
) -> Result<Json<User>> {
    let user = AuthService::new(state.pool())
        .update_profile(current.id, &body)
        .await?;

    record_activity(
        &state,
        &headers,
        user.id,
        ActivityKind::ProfileUpdated,
        None,
    )
    .await;

    Ok(Json(user))
}

/// Most recent activity first.
#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn activity(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityEntry>>> {
    let entries = ActivityRepository::new(state.pool())
        .recent(current.id, query.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT))
        .await?;

    Ok(Json(entries))
}

/// Saved addresses, default first.
#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn addresses(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Vec<Address>>> {
    let addresses = AddressRepository::new(state.pool()).list(current.id).await?;
    Ok(Json(addresses))
}

/// Save a new address.
#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn create_address(
    State(state): State<AppState>,
    headers: HeaderMap,
    RequireAuth(current): RequireAuth,
    Json(body): Json<AddressInput>,
) -> Result<(StatusCode, Json<Address>)> {
    let valid = body.validate().map_err(AppError::BadRequest)?;
    let address = AddressRepository::new(state.pool())
        .create(current.id, &valid)
        .await?;

    record_activity(
        &state,
        &headers,
        current.id,
        ActivityKind::AddressCreated,
        Some(json!({ "address_id": address.id })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(address)))
}

/// Replace an address.
#[instrument(skip_all, fields(user_id = %current.id, address_id = id))]
pub async fn update_address(
    State(state): State<AppState>,
    headers: HeaderMap,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
    Json(body): Json<AddressInput>,
) -> Result<Json<Address>> {
    let valid = body.validate().map_err(AppError::BadRequest)?;
    let address = AddressRepository::new(state.pool())
        .update(current.id, AddressId::new(id), &valid)
        .await?;

    record_activity(
        &state,
        &headers,
        current.id,
        ActivityKind::AddressUpdated,
        Some(json!({ "address_id": address.id })),
    )
    .await;

    Ok(Json(address))
}

/// Delete an address; the newest remaining one becomes default if needed.
#[instrument(skip_all, fields(user_id = %current.id, address_id = id))]
pub async fn delete_address(
    State(state): State<AppState>,
    headers: HeaderMap,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    AddressRepository::new(state.pool())
        .delete(current.id, AddressId::new(id))
        .await?;

    record_activity(
        &state,
        &headers,
        current.id,
        ActivityKind::AddressDeleted,
        Some(json!({ "address_id": id })),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Make an address the default.
#[instrument(skip_all, fields(user_id = %current.id, address_id = id))]
pub async fn set_default_address(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<Address>> {
    let address = AddressRepository::new(state.pool())
        .set_default(current.id, AddressId::new(id))
        .await?;

    Ok(Json(address))
}
