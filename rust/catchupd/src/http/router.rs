use super::handlers::{catchups, downloads, pages, students};
use super::types::AppState;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::{from_fn, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tracing::{debug, Instrument};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::dashboard))
        .route("/health", get(pages::health))
        .route(
            "/students",
            get(students::list_students).post(students::create_student),
        )
        .route("/catchups", post(catchups::create_catchup))
        .route("/catchups/all", get(catchups::list_all))
        .route("/catchups/by_name/:name", get(catchups::list_by_name))
        .route("/catchups/download/all", get(downloads::download_all))
        .route(
            "/catchups/download/by_name/:name",
            get(downloads::download_by_name),
        )
        .layer(from_fn(request_tracing))
        .with_state(state)
}

async fn request_tracing(request: Request<Body>, next: Next) -> Response {
    let span = tracing::info_span!(
        "http.request",
        method = %request.method(),
        route = %request.uri().path(),
    );
    async move {
        let response = next.run(request).await;
        debug!(status = response.status().as_u16(), "request finished");
        response
    }
    .instrument(span)
    .await
}
