use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use staybook_auth::{AccessError, IdentityError};
use staybook_bookings::BookingError;
use staybook_core::{DomainError, StoreError};

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

/// Booking validator failures. The date/property/conflict kinds are all
/// client errors per the API contract; only dependency failures escalate.
pub fn booking_error_to_response(err: BookingError) -> axum::response::Response {
    let msg = err.to_string();
    match err {
        BookingError::InvalidDateRange => json_error(StatusCode::BAD_REQUEST, "invalid_date_range", msg),
        BookingError::PropertyNotFound => json_error(StatusCode::BAD_REQUEST, "property_not_found", msg),
        BookingError::DateConflict => json_error(StatusCode::BAD_REQUEST, "date_conflict", msg),
        BookingError::PriceOverflow => json_error(StatusCode::BAD_REQUEST, "price_overflow", msg),
        BookingError::BookingNotFound => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        BookingError::Dependency(e) => store_error_to_response(e),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        // A write lost the race to a conflicting booking; same outcome as the
        // validator spotting it first.
        StoreError::Conflict(msg) => json_error(StatusCode::BAD_REQUEST, "date_conflict", msg),
        StoreError::Corrupt(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_corrupt", msg)
        }
        StoreError::Unavailable(msg) => {
            json_error(StatusCode::BAD_GATEWAY, "store_unavailable", msg)
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let msg = err.to_string();
    match err {
        DomainError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        DomainError::InvariantViolation(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::Conflict(_) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn identity_error_to_response(err: IdentityError) -> axum::response::Response {
    let msg = err.to_string();
    match err {
        IdentityError::InvalidEmail => json_error(StatusCode::BAD_REQUEST, "invalid_email", msg),
        IdentityError::WeakPassword => json_error(StatusCode::BAD_REQUEST, "weak_password", msg),
        IdentityError::EmailTaken => json_error(StatusCode::BAD_REQUEST, "email_taken", msg),
        IdentityError::InvalidCredentials => {
            json_error(StatusCode::BAD_REQUEST, "invalid_credentials", msg)
        }
        IdentityError::Unavailable(_) => {
            json_error(StatusCode::BAD_GATEWAY, "identity_unavailable", msg)
        }
    }
}

pub fn access_error_to_response(err: AccessError) -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string())
}
