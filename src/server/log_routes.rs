use super::http_server::AppState;
use crate::db_operations::{Collection, Filter};
use crate::logging;
use actix_web::{web, HttpResponse, Responder};
use log::warn;
use serde_json::json;

/// List recent log lines, oldest first
pub async fn list_logs() -> impl Responder {
    HttpResponse::Ok().json(logging::recent_logs())
}

/// Report whether the store answers within the session timeout.
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    let result = state
        .session
        .run("count", |store| store.count(Collection::Orders, &Filter::new()))
        .await;

    match result {
        Ok(orders) => HttpResponse::Ok().json(json!({"status": "ok", "orders": orders})),
        Err(e) => {
            warn!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "error": e.to_string(),
            }))
        }
    }
}
