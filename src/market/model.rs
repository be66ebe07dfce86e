use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;

/// Platforms whose accounts can be offered for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Gmail,
    Telegram,
    Whatsapp,
    Facebook,
}

impl Platform {
    /// Flat amount in BDT credited for an approved account. Captured onto the
    /// request at submission time, so editing this table never reprices
    /// requests already in the queue.
    pub fn price(self) -> i64 {
        match self {
            Platform::Gmail => 15,
            Platform::Telegram => 25,
            Platform::Whatsapp => 20,
            Platform::Facebook => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
        }
    }

    /// APPROVED and REJECTED are terminal: only a PENDING request may move.
    /// This is what keeps the approval balance credit from applying twice.
    pub fn transition(self, to: RequestStatus) -> Result<RequestStatus, AppError> {
        match (self, to) {
            (RequestStatus::Pending, RequestStatus::Approved)
            | (RequestStatus::Pending, RequestStatus::Rejected) => Ok(to),
            _ => Err(AppError::InvalidTransition {
                entity: "sell request",
                from: self.as_str(),
                to: to.as_str(),
            }),
        }
    }
}

/// A user's offer of account credentials at the fixed platform price,
/// queued for admin moderation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Denormalized for display; no referential integrity with the user list.
    pub user_email: String,
    pub platform: Platform,
    /// Opaque payload, e.g. "email|pass". Never parsed or validated.
    pub credentials: String,
    pub status: RequestStatus,
    pub amount: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}
