use axum::Json;
use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to the Docling Gateway!"
    }))
}
