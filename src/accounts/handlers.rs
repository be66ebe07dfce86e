use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    accounts::{
        dto::{ActivationInfo, ActivationRequest, LoginRequest, PublicUser, RegisterRequest},
        service,
    },
    config::{ACTIVATION_FEE_BDT, PAYMENT_NUMBER},
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/activation", get(activation_info).post(submit_activation))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<PublicUser>, AppError> {
    // required-field check lives at this boundary; the service takes any input
    if payload.full_name.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation("all fields are required"));
    }
    let user = service::register(&state, &payload.full_name, &payload.email, &payload.password)
        .await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<PublicUser>, AppError> {
    let user = service::login(&state, &payload.email, &payload.password).await?;
    Ok(Json(user.into()))
}

async fn logout(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    service::logout(&state).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_me(State(state): State<AppState>) -> Result<Json<PublicUser>, AppError> {
    let user = service::session_user(&state)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(user.into()))
}

async fn activation_info() -> Json<ActivationInfo> {
    Json(ActivationInfo {
        payment_number: PAYMENT_NUMBER,
        fee_bdt: ACTIVATION_FEE_BDT,
    })
}

#[instrument(skip(state, payload))]
async fn submit_activation(
    State(state): State<AppState>,
    Json(payload): Json<ActivationRequest>,
) -> Result<Json<PublicUser>, AppError> {
    if payload.trx_id.is_empty() {
        return Err(AppError::Validation("transaction id is required"));
    }
    let user = service::session_user(&state)
        .await?
        .ok_or(AppError::Unauthorized)?;
    let updated =
        service::submit_activation_payment(&state, user.id, &payload.method, &payload.trx_id)
            .await?;
    Ok(Json(updated.into()))
}
