use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::accounts::model::{ActivationPayment, User, UserRole, UserStatus};
use crate::accounts::password;
use crate::config::{ADMIN_EMAIL, ADMIN_FULL_NAME, ADMIN_PASSWORD};
use crate::error::AppError;
use crate::state::AppState;

/// Seeds the bootstrap admin into a store whose user collection has never
/// been written. Idempotent: a present-but-empty collection is left alone.
/// Callers must hold the state write lock.
async fn ensure_seeded(state: &AppState) -> Result<(), AppError> {
    if state.store.load_users().await?.is_some() {
        return Ok(());
    }
    let admin = User {
        id: Uuid::new_v4(),
        full_name: ADMIN_FULL_NAME.into(),
        email: ADMIN_EMAIL.into(),
        password_hash: password::hash_password(ADMIN_PASSWORD)?,
        role: UserRole::Admin,
        status: UserStatus::Active,
        balance: 0,
        total_withdrawn: 0,
        activation_payment: None,
    };
    state.store.save_users(std::slice::from_ref(&admin)).await?;
    info!(email = ADMIN_EMAIL, "seeded bootstrap admin");
    Ok(())
}

pub async fn register(
    state: &AppState,
    full_name: &str,
    email: &str,
    password_plain: &str,
) -> Result<User, AppError> {
    let _guard = state.write_lock.lock().await;
    ensure_seeded(state).await?;

    let mut users = state.store.load_users().await?.unwrap_or_default();
    if users.iter().any(|u| u.email == email) {
        warn!(email, "registration with taken email");
        return Err(AppError::DuplicateEmail);
    }

    let user = User {
        id: Uuid::new_v4(),
        full_name: full_name.to_owned(),
        email: email.to_owned(),
        password_hash: password::hash_password(password_plain)?,
        role: UserRole::User,
        status: UserStatus::PendingActivation,
        balance: 0,
        total_withdrawn: 0,
        activation_payment: None,
    };
    users.push(user.clone());
    state.store.save_users(&users).await?;

    // registration doubles as login
    state.store.set_session_user_id(Some(user.id)).await?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

pub async fn login(state: &AppState, email: &str, password_plain: &str) -> Result<User, AppError> {
    let _guard = state.write_lock.lock().await;
    ensure_seeded(state).await?;

    let users = state.store.load_users().await?.unwrap_or_default();
    let user = users.into_iter().find(|u| u.email == email).ok_or_else(|| {
        warn!(email, "login with unknown email");
        AppError::InvalidCredentials
    })?;

    if !password::verify_password(password_plain, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    state.store.set_session_user_id(Some(user.id)).await?;
    info!(user_id = %user.id, "user logged in");
    Ok(user)
}

/// Clears the session pointer; idempotent.
pub async fn logout(state: &AppState) -> Result<(), AppError> {
    state.store.set_session_user_id(None).await?;
    Ok(())
}

/// Resolves the session pointer against the current user collection. A
/// dangling pointer reads as anonymous.
pub async fn session_user(state: &AppState) -> Result<Option<User>, AppError> {
    let _guard = state.write_lock.lock().await;
    ensure_seeded(state).await?;

    let Some(id) = state.store.session_user_id().await? else {
        return Ok(None);
    };
    let users = state.store.load_users().await?.unwrap_or_default();
    Ok(users.into_iter().find(|u| u.id == id))
}

/// Records the activation-fee report and moves the account to
/// PENDING_APPROVAL. Only valid from PENDING_ACTIVATION.
pub async fn submit_activation_payment(
    state: &AppState,
    user_id: Uuid,
    method: &str,
    trx_id: &str,
) -> Result<User, AppError> {
    let _guard = state.write_lock.lock().await;

    let mut users = state.store.load_users().await?.unwrap_or_default();
    let user = users
        .iter_mut()
        .find(|u| u.id == user_id)
        .ok_or(AppError::NotFound("user"))?;

    user.status = user.status.transition(UserStatus::PendingApproval)?;
    user.activation_payment = Some(ActivationPayment {
        method: method.to_owned(),
        trx_id: trx_id.to_owned(),
        submitted_at: OffsetDateTime::now_utc(),
    });
    let updated = user.clone();

    state.store.save_users(&users).await?;
    info!(user_id = %user_id, method, "activation payment submitted");
    Ok(updated)
}

/// Admin moderation: approve (→ ACTIVE), ban, unban. The transition table on
/// `UserStatus` decides what is reachable; only the status field changes.
pub async fn update_user_status(
    state: &AppState,
    user_id: Uuid,
    new_status: UserStatus,
) -> Result<User, AppError> {
    let _guard = state.write_lock.lock().await;

    let mut users = state.store.load_users().await?.unwrap_or_default();
    let user = users
        .iter_mut()
        .find(|u| u.id == user_id)
        .ok_or(AppError::NotFound("user"))?;

    let from = user.status;
    user.status = user.status.transition(new_status)?;
    let updated = user.clone();

    state.store.save_users(&users).await?;
    info!(user_id = %user_id, from = from.as_str(), to = new_status.as_str(), "user status changed");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn fresh_store_seeds_admin_who_can_log_in() {
        let state = AppState::in_memory();
        let admin = login(&state, "admin@easyearn.com", "admin123")
            .await
            .expect("seeded admin login");
        assert_eq!(admin.role, UserRole::Admin);
        assert_eq!(admin.status, UserStatus::Active);
        assert_eq!(admin.balance, 0);
    }

    #[tokio::test]
    async fn seed_runs_once() {
        let state = AppState::in_memory();
        session_user(&state).await.unwrap();
        session_user(&state).await.unwrap();
        let users = state.store.load_users().await.unwrap().unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn register_auto_logs_in_as_pending_activation() {
        let state = AppState::in_memory();
        let user = register(&state, "Jane Doe", "jane@example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(user.status, UserStatus::PendingActivation);
        assert_eq!(user.balance, 0);

        let session = session_user(&state).await.unwrap().expect("auto-login");
        assert_eq!(session.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_first_record_untouched() {
        let state = AppState::in_memory();
        let first = register(&state, "Jane", "jane@example.com", "first-pass")
            .await
            .unwrap();
        let err = register(&state, "Impostor", "jane@example.com", "other-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));

        let again = login(&state, "jane@example.com", "first-pass").await.unwrap();
        assert_eq!(again.id, first.id);
        assert_eq!(again.full_name, "Jane");
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let state = AppState::in_memory();
        register(&state, "Jane", "jane@example.com", "pw").await.unwrap();
        let err = login(&state, "Jane@Example.com", "pw").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let state = AppState::in_memory();
        register(&state, "Jane", "jane@example.com", "pw").await.unwrap();
        let a = login(&state, "jane@example.com", "nope").await.unwrap_err();
        let b = login(&state, "nobody@example.com", "pw").await.unwrap_err();
        assert_eq!(a.to_string(), b.to_string());
    }

    #[tokio::test]
    async fn logout_is_idempotent_and_clears_session() {
        let state = AppState::in_memory();
        register(&state, "Jane", "jane@example.com", "pw").await.unwrap();
        logout(&state).await.unwrap();
        logout(&state).await.unwrap();
        assert!(session_user(&state).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn dangling_session_pointer_is_anonymous() {
        let state = AppState::in_memory();
        session_user(&state).await.unwrap(); // seed
        state
            .store
            .set_session_user_id(Some(Uuid::new_v4()))
            .await
            .unwrap();
        assert!(session_user(&state).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn activation_payment_moves_to_pending_approval() {
        let state = AppState::in_memory();
        let user = register(&state, "Jane", "jane@example.com", "pw").await.unwrap();
        let updated = submit_activation_payment(&state, user.id, "Bkash", "TRX123")
            .await
            .unwrap();
        assert_eq!(updated.status, UserStatus::PendingApproval);
        let payment = updated.activation_payment.expect("payment recorded");
        assert_eq!(payment.method, "Bkash");
        assert_eq!(payment.trx_id, "TRX123");
    }

    #[tokio::test]
    async fn activation_payment_cannot_be_submitted_twice() {
        let state = AppState::in_memory();
        let user = register(&state, "Jane", "jane@example.com", "pw").await.unwrap();
        submit_activation_payment(&state, user.id, "Bkash", "TRX1").await.unwrap();
        let err = submit_activation_payment(&state, user.id, "Nagad", "TRX2")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn activation_payment_for_unknown_user_is_not_found() {
        let state = AppState::in_memory();
        session_user(&state).await.unwrap(); // seed
        let err = submit_activation_payment(&state, Uuid::new_v4(), "Bkash", "TRX")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("user")));
    }

    #[tokio::test]
    async fn ban_unban_round_trip_keeps_other_fields() {
        let state = AppState::in_memory();
        let user = register(&state, "Jane", "jane@example.com", "pw").await.unwrap();
        submit_activation_payment(&state, user.id, "Bkash", "TRX1").await.unwrap();
        update_user_status(&state, user.id, UserStatus::Active).await.unwrap();

        let banned = update_user_status(&state, user.id, UserStatus::Banned).await.unwrap();
        assert_eq!(banned.status, UserStatus::Banned);

        let restored = update_user_status(&state, user.id, UserStatus::Active).await.unwrap();
        assert_eq!(restored.status, UserStatus::Active);
        assert_eq!(restored.full_name, "Jane");
        assert_eq!(restored.balance, 0);
        assert!(restored.activation_payment.is_some());
    }

    #[tokio::test]
    async fn approving_a_user_who_never_paid_is_rejected() {
        let state = AppState::in_memory();
        let user = register(&state, "Jane", "jane@example.com", "pw").await.unwrap();
        let err = update_user_status(&state, user.id, UserStatus::Active)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }
}
