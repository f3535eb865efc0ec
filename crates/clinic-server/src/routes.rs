//! HTTP routes.
//!
//! - `GET /health`
//! - `GET /api/patients/:id/receipts/:kind` (PDF)
//! - `GET /api/inventory/:clinic_id`
//! - `GET /api/inventory/items/:inventory_id/history`

use axum::extract::{Path, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use clinic_core::models::{InventoryHistory, InventoryLine};
use clinic_core::ReceiptKind;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    // NOTE: Path params use `:param` syntax (axum 0.7).
    Router::new()
        .route("/health", get(health))
        .route("/api/patients/:id/receipts/:kind", get(patient_receipt))
        .route("/api/inventory/:clinic_id", get(clinic_inventory))
        .route(
            "/api/inventory/items/:inventory_id/history",
            get(inventory_history),
        )
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Render a patient's latest visit as an inline PDF.
async fn patient_receipt(
    State(state): State<AppState>,
    Path((patient_id, kind)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let kind: ReceiptKind = kind.parse()?;

    let document = tokio::task::spawn_blocking(move || {
        let db = state.db()?;
        state
            .exporter
            .export_patient(&db, &patient_id, kind)
            .map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("render task failed: {e}")))??;

    let content_disposition = HeaderValue::from_str(&document.content_disposition())
        .map_err(|e| ApiError::Internal(format!("bad filename header: {e}")))?;
    let etag = HeaderValue::from_str(&format!("\"{}\"", document.fingerprint))
        .map_err(|e| ApiError::Internal(format!("bad etag header: {e}")))?;

    let content_type = HeaderValue::from_static(document.content_type);
    let mut response = document.bytes.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::CONTENT_DISPOSITION, content_disposition);
    headers.insert(header::ETAG, etag);
    Ok(response)
}

async fn clinic_inventory(
    State(state): State<AppState>,
    Path(clinic_id): Path<i64>,
) -> Result<Json<Vec<InventoryLine>>, ApiError> {
    let db = state.db()?;
    if db.get_clinic(clinic_id)?.is_none() {
        return Err(ApiError::NotFound(format!("clinic {clinic_id}")));
    }
    Ok(Json(db.list_inventory(clinic_id)?))
}

async fn inventory_history(
    State(state): State<AppState>,
    Path(inventory_id): Path<i64>,
) -> Result<Json<Vec<InventoryHistory>>, ApiError> {
    let db = state.db()?;
    if db.get_inventory(inventory_id)?.is_none() {
        return Err(ApiError::NotFound(format!("inventory item {inventory_id}")));
    }
    Ok(Json(db.inventory_history(inventory_id)?))
}
