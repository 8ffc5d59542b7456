use std::sync::Arc;

use axum::{Extension, Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use chrono::Utc;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let user_id = match services.identity.register(&body.email, &body.password).await {
        Ok(id) => id,
        Err(e) => return errors::identity_error_to_response(e),
    };

    tracing::info!(%user_id, "registered user");
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "user_id": user_id.to_string() })),
    )
        .into_response()
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let user_id = match services.identity.login(&body.email, &body.password).await {
        Ok(id) => id,
        Err(e) => return errors::identity_error_to_response(e),
    };

    let (token, claims) = match services.sessions.issue(user_id, Utc::now()) {
        Ok(issued) => issued,
        Err(e) => {
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "session_error",
                e.to_string(),
            );
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "token": token,
            "user_id": user_id.to_string(),
            "expires_at": claims.expires_at.to_rfc3339(),
        })),
    )
        .into_response()
}
