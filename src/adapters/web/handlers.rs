//! HTTP request handlers for the web adapter.

use axum::{Json, extract::State, http::Uri};
use std::sync::Arc;

use crate::domain::orchestrator::import_and_save;
use crate::domain::report::ImportReport;
use crate::domain::request::ImportRequest;

use super::{AppState, WebError};

pub async fn health() -> &'static str {
    "ok"
}

/// Body is parsed by hand so malformed JSON is a 400 with a report body.
pub async fn import(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<ImportReport>, WebError> {
    let request: ImportRequest = serde_json::from_str(&body)
        .map_err(|e| WebError::bad_request(format!("Invalid request body: {e}")))?;

    let report = tokio::task::spawn_blocking(move || {
        // A panicked import leaves partial blocks, the same as a failed write.
        let mut sheet = state.sheet.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("sheet lock was poisoned by an earlier import; continuing");
            state.sheet.clear_poison();
            poisoned.into_inner()
        });
        import_and_save(&request, &mut **sheet, &*state.data_port, &*state.ai_port)
    })
    .await
    .map_err(|e| WebError::internal(format!("import task failed: {e}")))?;

    Ok(Json(report))
}

pub async fn not_found(uri: Uri) -> WebError {
    WebError::not_found(format!("No route for {}", uri.path()))
}
