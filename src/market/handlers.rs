use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    accounts::service as accounts,
    error::AppError,
    market::{
        model::{Platform, SellRequest},
        service,
    },
    state::AppState,
};

/// Request body for offering an account for sale.
#[derive(Debug, Deserialize)]
pub struct SellRequestBody {
    pub platform: Platform,
    pub credentials: String,
}

pub fn sell_routes() -> Router<AppState> {
    Router::new().route("/sell-requests", post(submit).get(list_mine))
}

#[instrument(skip(state, payload))]
async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<SellRequestBody>,
) -> Result<Json<SellRequest>, AppError> {
    let user = accounts::session_user(&state)
        .await?
        .ok_or(AppError::Unauthorized)?;
    let request = service::submit_sell_request(
        &state,
        user.id,
        &user.email,
        payload.platform,
        &payload.credentials,
    )
    .await?;
    Ok(Json(request))
}

async fn list_mine(State(state): State<AppState>) -> Result<Json<Vec<SellRequest>>, AppError> {
    let user = accounts::session_user(&state)
        .await?
        .ok_or(AppError::Unauthorized)?;
    let requests = service::user_sell_requests(&state, user.id).await?;
    Ok(Json(requests))
}
