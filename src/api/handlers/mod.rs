/// Embedded viewer page and static files.
pub mod assets;
/// Plotly figure endpoint.
pub mod graph;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
