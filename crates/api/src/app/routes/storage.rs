use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Multipart},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;

use staybook_infra::{MEDIA_BUCKET, build_object_path};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new().route("/upload", post(upload))
}

/// Multipart form: `file` (required), `folder` (optional). The stored path is
/// prefixed with the uploader's id so per-user conventions hold.
pub async fn upload(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    mut multipart: Multipart,
) -> axum::response::Response {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut folder: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return errors::json_error(StatusCode::BAD_REQUEST, "invalid_multipart", e.to_string());
            }
        };

        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = match field.bytes().await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        return errors::json_error(
                            StatusCode::BAD_REQUEST,
                            "invalid_multipart",
                            e.to_string(),
                        );
                    }
                };
                file = Some((name, content_type, bytes.to_vec()));
            }
            Some("folder") => match field.text().await {
                Ok(text) => folder = Some(text),
                Err(e) => {
                    return errors::json_error(
                        StatusCode::BAD_REQUEST,
                        "invalid_multipart",
                        e.to_string(),
                    );
                }
            },
            _ => {}
        }
    }

    let Some((name, content_type, bytes)) = file else {
        return errors::json_error(StatusCode::BAD_REQUEST, "missing_file", "No file provided");
    };

    let path = build_object_path(user.user_id(), folder.as_deref(), &name, Utc::now());

    if let Err(e) = services.media.put(&path, &content_type, bytes).await {
        return errors::store_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "bucket": MEDIA_BUCKET, "path": path })),
    )
        .into_response()
}
