use super::http_helpers::query_error_handler;
use super::{log_routes, metrics_routes};
use crate::db_operations::StoreSession;
use crate::error::{SalesError, SalesResult};
use crate::ingestion::routes as ingestion_routes;
use crate::metrics::MetricsService;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer as ActixHttpServer};
use log::info;

/// HTTP server for the sales metrics service.
///
/// Exposes the metric endpoints under `/api` and the refresh endpoint at
/// `/refresh`. All handlers share one store session; there is no locking
/// between requests.
pub struct SalesHttpServer {
    state: web::Data<AppState>,
    /// The HTTP server bind address
    bind_address: String,
}

/// Shared application state for the HTTP server.
pub struct AppState {
    /// Store session used by the refresh endpoint
    pub session: StoreSession,
    pub metrics: MetricsService,
}

impl AppState {
    pub fn new(session: StoreSession) -> Self {
        Self {
            metrics: MetricsService::new(session.clone()),
            session,
        }
    }
}

impl SalesHttpServer {
    /// Create a new HTTP server.
    ///
    /// # Arguments
    ///
    /// * `session` - The store session every handler uses
    /// * `bind_address` - The address to bind to (e.g., "0.0.0.0:8080")
    pub fn new(session: StoreSession, bind_address: &str) -> Self {
        Self {
            state: web::Data::new(AppState::new(session)),
            bind_address: bind_address.to_string(),
        }
    }

    /// Run the HTTP server until it is shut down.
    ///
    /// # Errors
    ///
    /// Returns a `SalesError` if:
    /// * There is an error binding to the specified address
    /// * There is an error while the server is running
    pub async fn run(&self) -> SalesResult<()> {
        info!("HTTP server running on {}", self.bind_address);

        let app_state = self.state.clone();
        let server = ActixHttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(app_state.clone())
                .configure(configure_routes)
        })
        .bind(&self.bind_address)
        .map_err(|e| SalesError::config(format!("Failed to bind HTTP server: {}", e)))?
        .run();

        server.await?;
        Ok(())
    }
}

/// Register every route. Shared by the server and the HTTP tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .route("/refresh", web::post().to(ingestion_routes::refresh))
        .service(
            web::scope("/api")
                // Revenue endpoints
                .route("/revenue", web::get().to(metrics_routes::total_revenue))
                .route(
                    "/revenue-by-product",
                    web::get().to(metrics_routes::revenue_by_product),
                )
                .route(
                    "/revenue-by-category",
                    web::get().to(metrics_routes::revenue_by_category),
                )
                .route(
                    "/revenue-by-region",
                    web::get().to(metrics_routes::revenue_by_region),
                )
                // Product ranking endpoints
                .route("/top-products", web::get().to(metrics_routes::top_products))
                .route(
                    "/top-products-by-category",
                    web::get().to(metrics_routes::top_products_by_category),
                )
                .route(
                    "/top-products-by-region",
                    web::get().to(metrics_routes::top_products_by_region),
                )
                // Customer and order endpoints
                .route(
                    "/total-customers",
                    web::get().to(metrics_routes::total_customers),
                )
                .route("/total-orders", web::get().to(metrics_routes::total_orders))
                .route(
                    "/average-order-value",
                    web::get().to(metrics_routes::average_order_value),
                )
                // Service endpoints
                .route("/health", web::get().to(log_routes::health))
                .route("/logs", web::get().to(log_routes::list_logs)),
        );
}
