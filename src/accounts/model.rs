use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    Admin,
}

/// Account lifecycle: register → report activation fee → admin approval.
/// BANNED is reachable from anywhere; unbanning goes back to ACTIVE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    PendingActivation,
    PendingApproval,
    Active,
    Banned,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::PendingActivation => "PENDING_ACTIVATION",
            UserStatus::PendingApproval => "PENDING_APPROVAL",
            UserStatus::Active => "ACTIVE",
            UserStatus::Banned => "BANNED",
        }
    }

    /// Transition table for the account state machine. PENDING_ACTIVATION is
    /// the initial state only — nothing ever moves back into it.
    pub fn can_transition(self, to: UserStatus) -> bool {
        use UserStatus::*;
        matches!(
            (self, to),
            (PendingActivation, PendingApproval)
                | (PendingApproval, Active)
                | (Banned, Active)
                | (PendingActivation, Banned)
                | (PendingApproval, Banned)
                | (Active, Banned)
        )
    }

    pub fn transition(self, to: UserStatus) -> Result<UserStatus, AppError> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(AppError::InvalidTransition {
                entity: "user",
                from: self.as_str(),
                to: to.as_str(),
            })
        }
    }
}

/// Record of the flat activation fee the user claims to have sent. Never
/// verified against the payment number or amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationPayment {
    pub method: String,
    pub trx_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    /// Wallet balance in BDT; only approval of a sell request credits it.
    pub balance: i64,
    /// Display counter; nothing in the system decrements the balance into it.
    pub total_withdrawn: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_payment: Option<ActivationPayment>,
}
