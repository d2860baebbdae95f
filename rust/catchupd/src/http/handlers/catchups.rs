use super::with_store;
use crate::http::error::ApiError;
use crate::http::types::{AppState, Message, NewCatchUp};
use crate::reports::{self, ChargeRecord, MonthlyEntry, DATE_FORMAT};
use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::json;
use tracing::info;

pub async fn create_catchup(
    State(state): State<AppState>,
    Json(body): Json<NewCatchUp>,
) -> Result<Json<Message>, ApiError> {
    // Checked only; the date is stored exactly as submitted.
    NaiveDate::parse_from_str(&body.date, DATE_FORMAT).map_err(|e| {
        ApiError::bad_params(format!("date must be YYYY-MM-DD: {e}"))
            .with_details(json!({ "date": body.date }))
    })?;

    let student_id = body.student_id;
    let id = with_store(&state.store, move |store| {
        store.create_catchup(student_id, &body.date, &body.lesson_missed)
    })
    .await?;
    info!(catchup_id = id, student_id, "catch-up recorded");
    Ok(Json(Message {
        message: "Catch-up recorded",
    }))
}

pub async fn list_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<ChargeRecord>>, ApiError> {
    let report = with_store(&state.store, move |store| {
        reports::student_report(store, &name)
    })
    .await?;
    Ok(Json(report.unwrap_or_default()))
}

pub async fn list_all(
    State(state): State<AppState>,
) -> Result<Json<IndexMap<String, Vec<MonthlyEntry>>>, ApiError> {
    let groups = with_store(&state.store, reports::monthly_report).await?;
    Ok(Json(reports::monthly_entries(groups)))
}
