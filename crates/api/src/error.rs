//! Mapping from domain and repository errors to JSON error responses.
//!
//! Every error body has the shape `{"error": "<code>", "message": "<text>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

use domus_db::repositories::{
    BuildingError, EngagementError, FaqError, IssueReportError, MessagingError, PaymentError,
    ServiceError, UserError, WalletError,
};
use domus_shared::AppError;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status and code.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 400 with a specific code.
    #[must_use]
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    /// 403 `forbidden`.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "forbidden", message)
    }

    /// 404 `not_found`.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    /// Status code of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            error!(code = self.code, error = %self.message, "request failed");
            "An internal error occurred".to_string()
        } else {
            self.message
        };

        (
            self.status,
            Json(json!({ "error": self.code, "message": message })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.error_code(), err.message())
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        AppError::Database(err.to_string()).into()
    }
}

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::NotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "wallet_not_found", err.to_string())
            }
            WalletError::Overflow(_) => Self::bad_request("invalid_amount", err.to_string()),
            WalletError::Database(_) => AppError::from(err).into(),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::DuplicateReceipt(_) => {
                Self::new(StatusCode::CONFLICT, "duplicate_receipt", err.to_string())
            }
            _ => AppError::from(err).into(),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::UsernameTaken(_) => {
                Self::new(StatusCode::CONFLICT, "username_taken", err.to_string())
            }
            _ => AppError::from(err).into(),
        }
    }
}

/// Repository errors that map through `AppError` unchanged.
macro_rules! via_app_error {
    ($($err:ty),+ $(,)?) => {
        $(
            impl From<$err> for ApiError {
                fn from(err: $err) -> Self {
                    AppError::from(err).into()
                }
            }
        )+
    };
}

via_app_error!(
    BuildingError,
    ServiceError,
    EngagementError,
    IssueReportError,
    MessagingError,
    FaqError,
);

#[cfg(test)]
mod tests {
    use super::*;
    use domus_core::wallet::BalanceOverflow;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case(AppError::Validation("bad".into()), StatusCode::BAD_REQUEST, "validation_error")]
    #[case(AppError::Conflict("dup".into()), StatusCode::CONFLICT, "conflict")]
    #[case(
        AppError::InsufficientFunds("low".into()),
        StatusCode::UNPROCESSABLE_ENTITY,
        "insufficient_funds"
    )]
    #[case(AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR, "internal_error")]
    fn test_app_error_mapping(
        #[case] err: AppError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let api = ApiError::from(err);
        assert_eq!(api.status(), status);
        assert_eq!(api.code(), code);
    }

    #[test]
    fn test_specific_codes() {
        let dup = ApiError::from(PaymentError::DuplicateReceipt("R-1".into()));
        assert_eq!(dup.status(), StatusCode::CONFLICT);
        assert_eq!(dup.code(), "duplicate_receipt");

        let missing = ApiError::from(WalletError::NotFound(7));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.code(), "wallet_not_found");

        let overflow = ApiError::from(WalletError::Overflow(BalanceOverflow {
            balance: Decimal::ONE,
            amount: Decimal::MAX,
        }));
        assert_eq!(overflow.status(), StatusCode::BAD_REQUEST);
        assert_eq!(overflow.code(), "invalid_amount");

        let taken = ApiError::from(UserError::UsernameTaken("ann".into()));
        assert_eq!(taken.code(), "username_taken");
    }
}
