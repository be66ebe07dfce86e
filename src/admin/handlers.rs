use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    accounts::{
        dto::PublicUser,
        model::{UserRole, UserStatus},
        service as accounts,
    },
    admin::service::{self, SystemStats},
    error::AppError,
    market::{
        model::{RequestStatus, SellRequest},
        service as market,
    },
    state::AppState,
};

/// Admin moderation body for a user.
#[derive(Debug, Deserialize)]
pub struct UserStatusBody {
    pub status: UserStatus,
}

/// Admin moderation body for a sell request.
#[derive(Debug, Deserialize)]
pub struct RequestStatusBody {
    pub status: RequestStatus,
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/stats", get(stats))
        .route("/admin/requests", get(list_requests))
        .route("/admin/users/:id/status", post(set_user_status))
        .route("/admin/requests/:id/status", post(set_request_status))
}

/// All admin routes act as the session user; anything below requires the
/// ADMIN role.
async fn require_admin(state: &AppState) -> Result<(), AppError> {
    let user = accounts::session_user(state)
        .await?
        .ok_or(AppError::Unauthorized)?;
    if user.role != UserRole::Admin {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, AppError> {
    require_admin(&state).await?;
    let users = service::list_users(&state).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

async fn stats(State(state): State<AppState>) -> Result<Json<SystemStats>, AppError> {
    require_admin(&state).await?;
    Ok(Json(service::system_stats(&state).await?))
}

async fn list_requests(State(state): State<AppState>) -> Result<Json<Vec<SellRequest>>, AppError> {
    require_admin(&state).await?;
    Ok(Json(market::all_sell_requests(&state).await?))
}

#[instrument(skip(state))]
async fn set_user_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UserStatusBody>,
) -> Result<Json<PublicUser>, AppError> {
    require_admin(&state).await?;
    let user = accounts::update_user_status(&state, id, body.status).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
async fn set_request_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RequestStatusBody>,
) -> Result<Json<SellRequest>, AppError> {
    require_admin(&state).await?;
    let request = market::update_sell_request_status(&state, id, body.status).await?;
    Ok(Json(request))
}
