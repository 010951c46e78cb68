use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use warung_core::DomainError;
use warung_infra::command_dispatcher::DispatchError;
use warung_infra::services::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match err {
        LedgerError::Dispatch(e) => dispatch_error_to_response(e),
        LedgerError::Projection(e) => {
            tracing::error!(error = %e, "projection failed after commit");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "projection_error",
                e.to_string(),
            )
        }
    }
}

pub fn dispatch_error_to_response(err: DispatchError) -> axum::response::Response {
    let code = err.code();
    match err {
        DispatchError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, code, msg),
        DispatchError::NotFound => json_error(StatusCode::NOT_FOUND, code, "not found"),
        DispatchError::InvalidTransition(msg) => json_error(StatusCode::CONFLICT, code, msg),
        DispatchError::InsufficientStock(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, code, msg)
        }
        DispatchError::Conflict(msg) => json_error(StatusCode::CONFLICT, code, msg),
        DispatchError::Deserialize(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, code, msg),
        DispatchError::Store(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, code, e.to_string())
        }
        DispatchError::Publish(msg) => json_error(StatusCode::BAD_GATEWAY, code, msg),
    }
}

/// Errors raised while parsing request fields (categories, statuses, dates).
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        other => dispatch_error_to_response(other.into()),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a path id, answering 400 `invalid_id` on garbage.
pub fn parse_id<T>(raw: &str, what: &str) -> Result<T, axum::response::Response>
where
    T: core::str::FromStr,
{
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("invalid {what} id")))
}
