//! HTTP route handler for the refresh API

use super::refresh::refresh_data;
use crate::server::http_helpers::error_response;
use crate::server::AppState;
use actix_web::{web, HttpResponse, Responder};
use log::info;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct RefreshParams {
    pub file: Option<String>,
}

/// Re-ingest the file named by the `file` query parameter.
///
/// Responds 200 even when individual rows failed; the per-row outcome is
/// returned in the `report` field.
pub async fn refresh(
    query: web::Query<RefreshParams>,
    state: web::Data<AppState>,
) -> impl Responder {
    let file = match query.file.as_deref().map(str::trim) {
        Some(file) if !file.is_empty() => file.to_string(),
        _ => {
            return HttpResponse::BadRequest().json(json!({"error": "CSV file path is required"}));
        }
    };

    info!("Received refresh request for {}", file);
    match refresh_data(&state.session, &file).await {
        Ok(report) => HttpResponse::Ok().json(json!({
            "message": "Data refreshed successfully",
            "report": report,
        })),
        Err(e) => error_response(&e),
    }
}
