use axum::response::Html;
use axum::Json;
use serde_json::json;

const DASHBOARD: &str = include_str!("../../../assets/dashboard.html");

pub async fn dashboard() -> Html<String> {
    let month = chrono::Local::now().format("%B").to_string();
    Html(DASHBOARD.replace("{{CURRENT_MONTH}}", &month))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}
