mod types;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use custodia_core::{AppError, OwnershipViolation, find_cause, render_chain};
use tracing::{debug, error, info, warn};

pub use types::ErrorResponse;

/// Body returned for every failure that is not the caller's fault.
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

const BASIC_CHALLENGE: &str = "Basic realm=\"custodia\", charset=\"UTF-8\"";

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(
            status = %rejection.status(),
            detail = %rejection.body_text(),
            "request body rejected"
        );
        Self(AppError::Validation("malformed request body".to_owned()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(detail = %rejection.body_text(), "query string rejected");
        Self(AppError::Validation("malformed query string".to_owned()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError(app_error) = self;
        let chain = render_chain(&app_error);

        if let Some(violation) = find_cause::<OwnershipViolation>(&app_error) {
            return forbidden(violation, chain.as_str());
        }

        match &app_error {
            AppError::Validation(_) => {
                info!(cause = %chain, "rejected invalid request");
                error_response(StatusCode::BAD_REQUEST, app_error.to_string())
            }
            AppError::NotFound(_) => {
                info!(cause = %chain, "requested record does not exist");
                error_response(StatusCode::NOT_FOUND, app_error.to_string())
            }
            AppError::Unauthorized(_) => {
                info!(cause = %chain, "rejected unauthenticated request");
                let mut response = error_response(StatusCode::UNAUTHORIZED, app_error.to_string());
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static(BASIC_CHALLENGE),
                );
                response
            }
            AppError::OwnershipViolation(violation) => forbidden(violation, chain.as_str()),
            AppError::TransactionAborted { .. } | AppError::Internal(_) => {
                error!(cause = %chain, "request failed");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_SERVER_ERROR_MESSAGE.to_owned(),
                )
            }
        }
    }
}

fn forbidden(violation: &OwnershipViolation, chain: &str) -> Response {
    warn!(
        operation = %violation.operation(),
        cause = %chain,
        "write rejected by ownership guard"
    );
    error_response(StatusCode::FORBIDDEN, violation.message().to_owned())
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::{StatusCode, header};
    use axum::response::IntoResponse;
    use custodia_core::{AppError, GuardedOperation, OwnershipViolation};
    use serde_json::Value;

    use super::{ApiError, INTERNAL_SERVER_ERROR_MESSAGE};

    async fn translate(error: AppError) -> (StatusCode, Option<String>, String) {
        let response = ApiError::from(error).into_response();
        let status = response.status();
        let challenge = response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        let message = serde_json::from_slice::<Value>(&body)
            .ok()
            .and_then(|payload| payload["message"].as_str().map(str::to_owned))
            .unwrap_or_default();

        (status, challenge, message)
    }

    fn violation() -> OwnershipViolation {
        OwnershipViolation::new(
            GuardedOperation::Update,
            "cannot modify a record owned by another principal",
        )
    }

    #[tokio::test]
    async fn nested_ownership_violation_is_forbidden_with_its_message() {
        let error = AppError::aborted(
            "person update",
            AppError::aborted("outer retry", AppError::from(violation())),
        );

        let (status, _, message) = translate(error).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(message, "cannot modify a record owned by another principal");
    }

    #[tokio::test]
    async fn bare_ownership_violation_is_forbidden() {
        let (status, _, _) = translate(AppError::from(violation())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn internal_failures_hide_details() {
        let error = AppError::aborted(
            "person delete",
            AppError::Internal("connection reset by peer".to_owned()),
        );

        let (status, _, message) = translate(error).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, INTERNAL_SERVER_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn client_errors_keep_their_statuses() {
        let (not_found, _, _) = translate(AppError::NotFound("person 'x'".to_owned())).await;
        let (invalid, _, _) = translate(AppError::Validation("blank".to_owned())).await;

        assert_eq!(not_found, StatusCode::NOT_FOUND);
        assert_eq!(invalid, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unauthorized_carries_basic_challenge() {
        let (status, challenge, _) =
            translate(AppError::Unauthorized("authentication required".to_owned())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(challenge.is_some_and(|value| value.starts_with("Basic ")));
    }
}
