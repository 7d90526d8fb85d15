use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

const INDEX: &str = "templates/index.html";

pub async fn index() -> Response {
    match Assets::get(INDEX) {
        Some(content) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            Body::from(content.data),
        )
            .into_response(),
        None => {
            tracing::error!("Viewer template {} is not embedded", INDEX);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

pub async fn static_file(Path(path): Path<String>) -> Response {
    let path = format!("static/{}", path.trim_start_matches('/'));
    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                Body::from(content.data),
            )
                .into_response()
        }
        None => super::not_found().await.into_response(),
    }
}
