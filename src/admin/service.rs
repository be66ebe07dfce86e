use serde::Serialize;

use crate::accounts::model::{User, UserRole, UserStatus};
use crate::error::AppError;
use crate::market::model::RequestStatus;
use crate::state::AppState;

/// Headline counters for the admin console. Computed over the role-USER
/// population only; the bootstrap admin never counts itself.
#[derive(Debug, Serialize)]
pub struct SystemStats {
    pub total_users: usize,
    pub active_users: usize,
    pub pending_approval: usize,
    pub pending_sells: usize,
}

/// Non-admin accounts, newest registration first.
pub async fn list_users(state: &AppState) -> Result<Vec<User>, AppError> {
    let users = state.store.load_users().await?.unwrap_or_default();
    Ok(users
        .into_iter()
        .filter(|u| u.role == UserRole::User)
        .rev()
        .collect())
}

pub async fn system_stats(state: &AppState) -> Result<SystemStats, AppError> {
    let users = list_users(state).await?;
    let requests = state.store.load_requests().await?.unwrap_or_default();
    Ok(SystemStats {
        total_users: users.len(),
        active_users: users.iter().filter(|u| u.status == UserStatus::Active).count(),
        pending_approval: users
            .iter()
            .filter(|u| u.status == UserStatus::PendingApproval)
            .count(),
        pending_sells: requests
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .count(),
    })
}
