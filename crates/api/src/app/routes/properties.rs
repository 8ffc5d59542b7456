use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::Utc;

use staybook_auth::ensure_property_owner;
use staybook_core::{Money, PropertyId};
use staybook_listings::{Property, PropertyDraft, PropertyPatch};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub fn public_router() -> Router {
    Router::new()
        .route("/", get(list_properties))
        .route("/:id", get(get_property))
}

pub fn protected_router() -> Router {
    Router::new()
        .route("/", post(create_property))
        .route("/:id", put(update_property).delete(delete_property))
}

pub async fn list_properties(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let listings = match services.properties.list_active().await {
        Ok(listings) => listings,
        Err(e) => return errors::store_error_to_response(e),
    };
    let items = listings.iter().map(dto::property_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_property(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PropertyId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid property id"),
    };

    match services.properties.get(id).await {
        Ok(Some(p)) => (StatusCode::OK, Json(dto::property_to_json(&p))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "property not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_property(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<dto::CreatePropertyRequest>,
) -> axum::response::Response {
    let price_per_night = match Money::try_from_minor_signed(body.price_per_night) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let draft = PropertyDraft {
        title: body.title,
        description: body.description,
        location: body.location,
        price_per_night,
        is_active: body.is_active,
    };

    // Owner comes from the session, never from the body.
    let property = match Property::create(PropertyId::new(), user.user_id(), draft, Utc::now()) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.properties.insert(property.clone()).await {
        return errors::store_error_to_response(e);
    }

    tracing::info!(property_id = %property.id, owner_id = %property.owner_id, "created property");
    (StatusCode::CREATED, Json(dto::property_to_json(&property))).into_response()
}

pub async fn update_property(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdatePropertyRequest>,
) -> axum::response::Response {
    let id: PropertyId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid property id"),
    };

    let current = match services.properties.get(id).await {
        Ok(Some(p)) => p,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "property not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = ensure_property_owner(current.owner_id, user.user_id()) {
        return errors::access_error_to_response(e);
    }

    let price_per_night = match body.price_per_night.map(Money::try_from_minor_signed).transpose() {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let patch = PropertyPatch {
        title: body.title,
        description: body.description,
        location: body.location,
        price_per_night,
        is_active: body.is_active,
    };

    let updated = match current.apply_patch(patch) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.properties.update(updated.clone()).await {
        Ok(true) => (StatusCode::OK, Json(dto::property_to_json(&updated))).into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "property not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_property(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PropertyId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid property id"),
    };

    let current = match services.properties.get(id).await {
        Ok(Some(p)) => p,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "property not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = ensure_property_owner(current.owner_id, user.user_id()) {
        return errors::access_error_to_response(e);
    }

    match services.properties.delete(id).await {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "property not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
