mod common;

use actix_web::{http::StatusCode, test, web, App};
use common::TestFixture;
use sales_metrics::db_operations::Collection;
use sales_metrics::{configure_routes, refresh_data, AppState};
use serde_json::Value;

macro_rules! init_app {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new($fixture.session.clone())))
                .configure(configure_routes),
        )
        .await
    };
}

async fn loaded_fixture() -> TestFixture {
    let fixture = TestFixture::new();
    refresh_data(&fixture.session, fixture.scenario_csv())
        .await
        .unwrap();
    fixture
}

#[actix_web::test]
async fn test_refresh_requires_file() {
    let fixture = TestFixture::new();
    let app = init_app!(fixture);

    for uri in ["/refresh", "/refresh?file="] {
        let req = test::TestRequest::post().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "CSV file path is required");
    }
}

#[actix_web::test]
async fn test_refresh_missing_file_is_server_error() {
    let fixture = TestFixture::new();
    let app = init_app!(fixture);
    let missing = fixture.temp_dir.path().join("missing.csv");

    let req = test::TestRequest::post()
        .uri(&format!("/refresh?file={}", missing.display()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("missing.csv"));
}

#[actix_web::test]
async fn test_refresh_loads_file() {
    let fixture = TestFixture::new();
    let path = fixture.scenario_csv();
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri(&format!("/refresh?file={}", path.display()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Data refreshed successfully");
    assert_eq!(body["report"]["rows_read"], 2);

    let req = test::TestRequest::get().uri("/api/total-orders").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_orders"], 2);
}

#[actix_web::test]
async fn test_revenue_endpoints() {
    let fixture = loaded_fixture().await;
    let app = init_app!(fixture);

    let req = test::TestRequest::get()
        .uri("/api/revenue?start_date=2021-01-01&end_date=2021-12-31")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_revenue"], 50.0);

    let req = test::TestRequest::get().uri("/api/revenue-by-region").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["revenue_by_region"]["West"], 20.0);
    assert_eq!(body["revenue_by_region"]["East"], 30.0);

    let req = test::TestRequest::get().uri("/api/revenue-by-product").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["revenue_by_product"]["Widget"], 50.0);

    let req = test::TestRequest::get().uri("/api/revenue-by-category").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["revenue_by_category"]["Toys"], 50.0);
}

#[actix_web::test]
async fn test_default_dates_cover_loaded_data() {
    let fixture = loaded_fixture().await;
    let app = init_app!(fixture);

    let req = test::TestRequest::get().uri("/api/total-customers").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_customers"], 2);

    let req = test::TestRequest::get()
        .uri("/api/total-customers?start_date=2021-06-01")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_customers"], 1);
}

#[actix_web::test]
async fn test_top_products_endpoints() {
    let fixture = loaded_fixture().await;
    let app = init_app!(fixture);

    let req = test::TestRequest::get().uri("/api/top-products?limit=3").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let top = body["top_products_overall"].as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["product_name"], "Widget");
    assert_eq!(top[0]["quantity_sold"], 5);

    let req = test::TestRequest::get()
        .uri("/api/top-products-by-category?category=Toys")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["top_products_by_category"][0]["quantity_sold"], 5);

    let req = test::TestRequest::get()
        .uri("/api/top-products-by-region?region=West")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["top_products_by_region"][0]["quantity_sold"], 2);

    let req = test::TestRequest::get()
        .uri("/api/top-products-by-region")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["top_products_by_region"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_invalid_limit_is_bad_request() {
    let fixture = loaded_fixture().await;
    let app = init_app!(fixture);

    for uri in [
        "/api/top-products?limit=abc",
        "/api/top-products?limit=0",
        "/api/top-products-by-category?category=Toys&limit=-2",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }
}

#[actix_web::test]
async fn test_average_order_value_endpoint() {
    let fixture = loaded_fixture().await;
    let app = init_app!(fixture);

    let req = test::TestRequest::get().uri("/api/average-order-value").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["average_order_value"], 25.0);

    let req = test::TestRequest::get()
        .uri("/api/average-order-value?start_date=2030-01-01&end_date=2030-12-31")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "no data found");
}

#[actix_web::test]
async fn test_empty_store_returns_zeroes() {
    let fixture = TestFixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::get().uri("/api/revenue").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_revenue"], 0.0);

    let req = test::TestRequest::get().uri("/api/revenue-by-region").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["revenue_by_region"].as_object().unwrap().is_empty());
}

#[actix_web::test]
async fn test_health_and_logs() {
    let fixture = loaded_fixture().await;
    let app = init_app!(fixture);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["orders"], 2);

    let req = test::TestRequest::get().uri("/api/logs").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.is_array());
}

#[actix_web::test]
async fn test_refresh_with_failed_rows_still_succeeds() {
    let fixture = TestFixture::with_failing_writes(&[(Collection::Orders, "O2")]);
    let path = fixture.scenario_csv();
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri(&format!("/refresh?file={}", path.display()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Data refreshed successfully");
    assert_eq!(body["report"]["rows_failed"], 1);
    assert_eq!(body["report"]["orders"]["failed"], 1);

    let req = test::TestRequest::get().uri("/api/total-orders").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_orders"], 1);
}

#[actix_web::test]
async fn test_repeated_query_parameter_is_json_bad_request() {
    let fixture = loaded_fixture().await;
    let app = init_app!(fixture);

    for uri in [
        "/api/revenue?start_date=2021-01-01&start_date=2021-06-01",
        "/api/top-products?limit=3&limit=4",
        "/refresh?file=a.csv&file=b.csv",
    ] {
        let req = if uri.starts_with("/refresh") {
            test::TestRequest::post().uri(uri).to_request()
        } else {
            test::TestRequest::get().uri(uri).to_request()
        };
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let content_type = resp
            .headers()
            .get(actix_web::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("application/json"), "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("duplicate field"), "{}", uri);
    }
}
