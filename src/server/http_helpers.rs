use crate::error::{SalesError, SalesResult};
use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse};
use log::{error, warn};
use serde::Serialize;
use serde_json::{json, Map};

/// Wrap a successful result under `key`, or map the error to a response.
pub fn json_result<T: Serialize>(key: &str, result: SalesResult<T>) -> HttpResponse {
    let value = result.and_then(|value| Ok(serde_json::to_value(value)?));
    match value {
        Ok(value) => {
            let mut body = Map::new();
            body.insert(key.to_string(), value);
            HttpResponse::Ok().json(body)
        }
        Err(e) => error_response(&e),
    }
}

/// `{"error": message}` with 400 for caller mistakes and 500 otherwise.
pub fn error_response(e: &SalesError) -> HttpResponse {
    let body = json!({"error": e.to_string()});
    if e.is_client_error() {
        HttpResponse::BadRequest().json(body)
    } else {
        error!("Request failed: {}", e);
        HttpResponse::InternalServerError().json(body)
    }
}

/// Reject an undecodable query string (e.g. a repeated parameter) with the
/// same `{"error": message}` body as every other failure.
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    warn!("Rejected query string for {}: {}", req.path(), message);
    InternalError::from_response(err, HttpResponse::BadRequest().json(json!({"error": message})))
        .into()
}
