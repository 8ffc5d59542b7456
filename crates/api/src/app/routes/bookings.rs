use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};

use staybook_auth::{ensure_booking_guest, ensure_booking_party};
use staybook_bookings::{
    Booking, BookingError, BookingPatch, StayRequest, parse_date, validate, validate_patch,
};
use staybook_core::{BookingId, PropertyId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_booking).get(list_bookings))
        .route("/:id", get(get_booking).put(update_booking).delete(delete_booking))
}

/// Malformed dates fail the same way inverted ones do.
fn parse_request_date(s: &str) -> Result<NaiveDate, axum::response::Response> {
    parse_date(s).map_err(|_| errors::booking_error_to_response(BookingError::InvalidDateRange))
}

pub async fn create_booking(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<dto::CreateBookingRequest>,
) -> axum::response::Response {
    let property_id: PropertyId = match body.property_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid property id"),
    };
    let check_in = match parse_request_date(&body.check_in) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let check_out = match parse_request_date(&body.check_out) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let request = StayRequest {
        property_id,
        check_in,
        check_out,
    };
    let quote = match validate(
        services.properties.as_ref(),
        services.bookings.as_ref(),
        request,
        None,
    )
    .await
    {
        Ok(q) => q,
        Err(e) => return errors::booking_error_to_response(e),
    };

    let booking = Booking {
        id: BookingId::new(),
        property_id: quote.property_id,
        user_id: user.user_id(),
        stay: quote.stay,
        total_price: quote.total_price,
        created_at: Utc::now(),
    };

    // The store re-checks the overlap under its own serialization; a lost
    // race comes back as a conflict here.
    if let Err(e) = services.bookings.insert(booking.clone()).await {
        return errors::store_error_to_response(e);
    }

    tracing::info!(
        booking_id = %booking.id,
        property_id = %booking.property_id,
        nights = quote.nights,
        "created booking"
    );
    (StatusCode::CREATED, Json(dto::booking_to_json(&booking))).into_response()
}

pub async fn list_bookings(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> axum::response::Response {
    let bookings = match services.bookings.list_for_user(user.user_id()).await {
        Ok(bookings) => bookings,
        Err(e) => return errors::store_error_to_response(e),
    };
    let items = bookings.iter().map(dto::booking_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_booking(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BookingId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid booking id"),
    };

    let booking = match services.bookings.get(id).await {
        Ok(Some(b)) => b,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "booking not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = booking_access(&services, &booking, user).await {
        return e;
    }

    (StatusCode::OK, Json(dto::booking_to_json(&booking))).into_response()
}

pub async fn update_booking(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateBookingRequest>,
) -> axum::response::Response {
    let id: BookingId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid booking id"),
    };

    let property_id = match body.property_id.as_deref().map(str::parse::<PropertyId>).transpose() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid property id"),
    };
    let check_in = match body.check_in.as_deref().map(parse_request_date).transpose() {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let check_out = match body.check_out.as_deref().map(parse_request_date).transpose() {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let patch = BookingPatch {
        property_id,
        check_in,
        check_out,
    };

    // Unspecified fields default from the stored booking, so the full
    // post-update range is validated; the booking keeps its own slot.
    let (current, quote) = match validate_patch(
        services.properties.as_ref(),
        services.bookings.as_ref(),
        id,
        patch,
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(e) => return errors::booking_error_to_response(e),
    };

    if let Err(e) = ensure_booking_guest(current.user_id, user.user_id()) {
        return errors::access_error_to_response(e);
    }

    let updated = Booking {
        id: current.id,
        property_id: quote.property_id,
        user_id: current.user_id,
        stay: quote.stay,
        total_price: quote.total_price,
        created_at: current.created_at,
    };

    match services.bookings.update(updated.clone()).await {
        Ok(true) => (StatusCode::OK, Json(dto::booking_to_json(&updated))).into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "booking not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_booking(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BookingId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid booking id"),
    };

    let booking = match services.bookings.get(id).await {
        Ok(Some(b)) => b,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "booking not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = booking_access(&services, &booking, user).await {
        return e;
    }

    match services.bookings.delete(id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Booking deleted successfully" })),
        )
            .into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "booking not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Read/cancel access: the guest, or the owner of the booked property. If the
/// property is gone, only the guest remains.
async fn booking_access(
    services: &AppServices,
    booking: &Booking,
    user: UserContext,
) -> Result<(), axum::response::Response> {
    let property_owner = match services.properties.get(booking.property_id).await {
        Ok(found) => found.map(|p| p.owner_id).unwrap_or(booking.user_id),
        Err(e) => return Err(errors::store_error_to_response(e)),
    };

    ensure_booking_party(booking.user_id, property_owner, user.user_id())
        .map_err(errors::access_error_to_response)
}
