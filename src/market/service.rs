use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::market::model::{Platform, RequestStatus, SellRequest};
use crate::state::AppState;

/// Queues an offer at the current price-table amount. Deliberately lax: no
/// duplicate guard and no check that the submitting user is ACTIVE (the
/// screens only show the sell form to active users).
pub async fn submit_sell_request(
    state: &AppState,
    user_id: Uuid,
    user_email: &str,
    platform: Platform,
    credentials: &str,
) -> Result<SellRequest, AppError> {
    let _guard = state.write_lock.lock().await;

    let mut requests = state.store.load_requests().await?.unwrap_or_default();
    let request = SellRequest {
        id: Uuid::new_v4(),
        user_id,
        user_email: user_email.to_owned(),
        platform,
        credentials: credentials.to_owned(),
        status: RequestStatus::Pending,
        amount: platform.price(),
        submitted_at: OffsetDateTime::now_utc(),
    };
    requests.push(request.clone());
    state.store.save_requests(&requests).await?;

    info!(
        request_id = %request.id,
        user_id = %user_id,
        platform = ?platform,
        amount = request.amount,
        "sell request queued"
    );
    Ok(request)
}

/// One user's requests, most recent submission first.
pub async fn user_sell_requests(
    state: &AppState,
    user_id: Uuid,
) -> Result<Vec<SellRequest>, AppError> {
    let requests = state.store.load_requests().await?.unwrap_or_default();
    // append order is submission order
    Ok(requests
        .into_iter()
        .filter(|r| r.user_id == user_id)
        .rev()
        .collect())
}

/// The whole moderation queue, most recent submission first.
pub async fn all_sell_requests(state: &AppState) -> Result<Vec<SellRequest>, AppError> {
    let requests = state.store.load_requests().await?.unwrap_or_default();
    Ok(requests.into_iter().rev().collect())
}

/// Moderation transition. Approval credits the captured amount onto the
/// owner's balance; the PENDING-only guard is what makes that credit apply
/// exactly once.
pub async fn update_sell_request_status(
    state: &AppState,
    request_id: Uuid,
    new_status: RequestStatus,
) -> Result<SellRequest, AppError> {
    let _guard = state.write_lock.lock().await;

    let mut requests = state.store.load_requests().await?.unwrap_or_default();
    let request = requests
        .iter_mut()
        .find(|r| r.id == request_id)
        .ok_or(AppError::NotFound("sell request"))?;

    request.status = request.status.transition(new_status)?;
    let updated = request.clone();

    if new_status == RequestStatus::Approved {
        let mut users = state.store.load_users().await?.unwrap_or_default();
        match users.iter_mut().find(|u| u.id == updated.user_id) {
            Some(user) => {
                user.balance += updated.amount;
                let owner = user.id;
                let balance = user.balance;
                state.store.save_users(&users).await?;
                info!(user_id = %owner, amount = updated.amount, balance, "balance credited");
            }
            None => {
                // the owner id is denormalized with no referential integrity;
                // the request still resolves but the credit has nowhere to land
                warn!(request_id = %request_id, user_id = %updated.user_id, "approved request has no owner");
            }
        }
    }

    state.store.save_requests(&requests).await?;
    info!(request_id = %request_id, status = new_status.as_str(), "sell request moderated");
    Ok(updated)
}
