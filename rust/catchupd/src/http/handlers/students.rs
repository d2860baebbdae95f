use super::with_store;
use crate::db::StudentRow;
use crate::http::error::ApiError;
use crate::http::types::{AppState, Message, NewStudent};
use axum::extract::State;
use axum::Json;
use tracing::info;

pub async fn create_student(
    State(state): State<AppState>,
    Json(body): Json<NewStudent>,
) -> Result<Json<Message>, ApiError> {
    let name = body.name;
    let key = name.clone();
    let inserted = with_store(&state.store, move |store| store.create_student(&key)).await?;
    info!(name = %name, inserted, "student registered");
    Ok(Json(Message {
        message: "Student added",
    }))
}

pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentRow>>, ApiError> {
    let students = with_store(&state.store, |store| store.list_students()).await?;
    Ok(Json(students))
}
