pub mod catchups;
pub mod downloads;
pub mod pages;
pub mod students;

use crate::db::Store;
use crate::http::error::ApiError;
use axum::http::StatusCode;

/// Runs a store call on the blocking pool. Each call opens and closes its own
/// connection.
pub(crate) async fn with_store<T, E, F>(store: &Store, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Store) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| {
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "task_failed",
                e.to_string(),
            )
        })?
        .map_err(Into::into)
}
