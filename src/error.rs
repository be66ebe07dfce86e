use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failure taxonomy of the service layer. Every variant is recoverable and
/// surfaces to the client as a status code plus message; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An existing user already owns the email (exact, case-sensitive match).
    #[error("email already registered")]
    DuplicateEmail,

    /// Unknown email or wrong password; callers cannot tell which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Unknown user or sell-request id.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Empty required field, checked only at the presentation boundary.
    #[error("{0}")]
    Validation(&'static str),

    /// Status change rejected by the entity's transition table.
    #[error("cannot move {entity} from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: &'static str,
        to: &'static str,
    },

    /// No session user.
    #[error("not logged in")]
    Unauthorized,

    /// Route requires the ADMIN role.
    #[error("forbidden")]
    Forbidden,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateEmail | AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "internal error");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
