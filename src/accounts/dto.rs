use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::accounts::model::{ActivationPayment, User, UserRole, UserStatus};

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Activation-fee report for the session user.
#[derive(Debug, Deserialize)]
pub struct ActivationRequest {
    pub method: String,
    pub trx_id: String,
}

/// Static instructions for the activation screen.
#[derive(Debug, Serialize)]
pub struct ActivationInfo {
    pub payment_number: &'static str,
    pub fee_bdt: i64,
}

/// User as returned to clients; the password hash never leaves the store.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub balance: i64,
    pub total_withdrawn: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_payment: Option<ActivationPayment>,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            full_name: u.full_name,
            email: u.email,
            role: u.role,
            status: u.status,
            balance: u.balance,
            total_withdrawn: u.total_withdrawn,
            activation_payment: u.activation_payment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_has_no_password_field() {
        let user = User {
            id: Uuid::new_v4(),
            full_name: "Jane".into(),
            email: "jane@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: UserRole::User,
            status: UserStatus::Active,
            balance: 40,
            total_withdrawn: 0,
            activation_payment: None,
        };
        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
        assert!(json.contains("jane@example.com"));
    }
}
