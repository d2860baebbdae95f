use super::with_store;
use crate::http::error::ApiError;
use crate::http::types::AppState;
use crate::reports::{self, ALL_CATCHUPS_FILENAME, STUDENT_NOT_FOUND};
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::debug;

const CSV: &str = "text/csv; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

fn attachment(filename: &str, body: String) -> Result<Response, ApiError> {
    let value = format!("attachment; filename={filename}");
    let disposition = HeaderValue::from_bytes(value.as_bytes()).map_err(|_| {
        ApiError::bad_params("name cannot be used in a file name")
            .with_details(json!({ "filename": filename }))
    })?;
    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static(CSV)),
            (CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// CSV for one student. An unknown name is answered with a plain-text body
/// and status 200, never an error status.
pub async fn download_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let key = name.clone();
    let report =
        with_store(&state.store, move |store| reports::student_report(store, &key)).await?;

    let Some(records) = report else {
        debug!(name = %name, "download for unknown student");
        return Ok((
            [(CONTENT_TYPE, HeaderValue::from_static(TEXT))],
            STUDENT_NOT_FOUND,
        )
            .into_response());
    };

    attachment(
        &reports::student_csv_filename(&name),
        reports::student_csv(&name, &records),
    )
}

pub async fn download_all(State(state): State<AppState>) -> Result<Response, ApiError> {
    let groups = with_store(&state.store, reports::monthly_report).await?;
    attachment(ALL_CATCHUPS_FILENAME, reports::monthly_csv(&groups))
}
