//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type transport-agnostic while letting Actix
//! handlers turn failures into consistent JSON responses and status codes.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(err: &Error) -> Error {
    if matches!(err.code, ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = &err.trace_id {
            redacted = redacted.with_trace_id(id.clone());
        }
        redacted
    } else {
        err.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code)
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code, ErrorCode::InternalError) {
            error!(message = %self.message, "internal error surfaced to client");
        }
        HttpResponse::build(self.status_code()).json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorCode::InvalidRequest, 400)]
    #[case(ErrorCode::Unauthorized, 401)]
    #[case(ErrorCode::Forbidden, 403)]
    #[case(ErrorCode::NotFound, 404)]
    #[case(ErrorCode::Conflict, 409)]
    #[case(ErrorCode::InternalError, 500)]
    fn error_codes_map_to_http_statuses(#[case] code: ErrorCode, #[case] expected: u16) {
        let err = Error::new(code, "boom");
        assert_eq!(err.status_code().as_u16(), expected);
    }

    #[test]
    fn internal_messages_are_redacted() {
        let err = Error::internal("database password is hunter2");
        let redacted = redact_if_internal(&err);
        assert_eq!(redacted.message, "Internal server error");
    }

    #[test]
    fn client_errors_keep_their_message() {
        let err = Error::not_found("plot not found");
        assert_eq!(redact_if_internal(&err).message, "plot not found");
    }
}
