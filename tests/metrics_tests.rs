mod common;

use common::{sales_row, TestFixture};
use sales_metrics::db_operations::{Collection, Filter};
use sales_metrics::{refresh_data, DateRange, MetricsService, Order, SalesError};

async fn scenario_service() -> (TestFixture, MetricsService) {
    let fixture = TestFixture::new();
    refresh_data(&fixture.session, fixture.scenario_csv())
        .await
        .unwrap();
    let service = MetricsService::new(fixture.session.clone());
    (fixture, service)
}

fn year_2021() -> DateRange {
    DateRange::new("2021-01-01", "2021-12-31")
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[tokio::test]
async fn test_scenario_revenue_customers_and_top_product() {
    let (_fixture, service) = scenario_service().await;
    let range = year_2021();

    assert!(approx(service.total_revenue(&range).await.unwrap(), 50.0));
    assert_eq!(service.total_customers(&range).await.unwrap(), 2);
    assert_eq!(service.total_orders(&range).await.unwrap(), 2);

    let top = service.top_products(&range, None).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].product_name, "Widget");
    assert_eq!(top[0].quantity_sold, 5);
}

#[tokio::test]
async fn test_range_bounds_are_inclusive() {
    let (_fixture, service) = scenario_service().await;

    let may_only = DateRange::new("2021-05-01", "2021-05-01");
    assert!(approx(service.total_revenue(&may_only).await.unwrap(), 20.0));

    let outside = DateRange::new("2022-01-01", "2022-12-31");
    assert_eq!(service.total_revenue(&outside).await.unwrap(), 0.0);
    assert_eq!(service.total_orders(&outside).await.unwrap(), 0);
}

#[tokio::test]
async fn test_revenue_breakdowns_sum_to_total() {
    let fixture = TestFixture::new();
    let rows = [
        sales_row("O1", "P1", "C1", "Widget", "Toys", "West", "2021-01-10", "2", "10.0"),
        sales_row("O2", "P2", "C2", "Hammer", "Tools", "East", "2021-02-10", "1", "25.5"),
        sales_row("O3", "P3", "C1", "Blocks", "Toys", "East", "2021-03-10", "4", "3.25"),
        sales_row("O4", "P2", "C3", "Hammer", "Tools", "North", "2021-04-10", "3", "25.5"),
    ];
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    refresh_data(&fixture.session, fixture.write_csv("mixed.csv", &rows))
        .await
        .unwrap();
    let service = MetricsService::new(fixture.session.clone());
    let range = year_2021();

    let total = service.total_revenue(&range).await.unwrap();
    assert!(approx(total, 20.0 + 25.5 + 13.0 + 76.5));

    let stored = fixture
        .session
        .run("find", |store| store.find(Collection::Orders, &Filter::new()))
        .await
        .unwrap();
    let line_total: f64 = stored
        .into_iter()
        .map(|doc| serde_json::from_value::<Order>(doc).unwrap().revenue())
        .sum();
    assert!(approx(line_total, total));

    for breakdown in [
        service.revenue_by_product(&range).await.unwrap(),
        service.revenue_by_category(&range).await.unwrap(),
        service.revenue_by_region(&range).await.unwrap(),
    ] {
        assert!(approx(breakdown.values().sum::<f64>(), total));
    }

    let by_category = service.revenue_by_category(&range).await.unwrap();
    assert_eq!(by_category.len(), 2);
    assert!(approx(by_category["Tools"], 102.0));

    let average = service.average_order_value(&range).await.unwrap();
    let orders = service.total_orders(&range).await.unwrap();
    assert!(approx(average * orders as f64, total));
}

#[tokio::test]
async fn test_top_products_sorted_and_capped() {
    let fixture = TestFixture::new();
    let rows: Vec<String> = (1..=12)
        .map(|i| {
            sales_row(
                &format!("O{}", i),
                &format!("P{}", i),
                "C1",
                &format!("Product {}", i),
                if i % 2 == 0 { "Even" } else { "Odd" },
                "West",
                "2021-07-01",
                &i.to_string(),
                "1.0",
            )
        })
        .collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    refresh_data(&fixture.session, fixture.write_csv("many.csv", &rows))
        .await
        .unwrap();
    let service = MetricsService::new(fixture.session.clone());
    let range = year_2021();

    let top = service.top_products(&range, Some(50)).await.unwrap();
    assert_eq!(top.len(), 10);
    assert_eq!(top[0].product_name, "Product 12");
    assert!(top.windows(2).all(|w| w[0].quantity_sold >= w[1].quantity_sold));

    let top_three = service.top_products(&range, Some(3)).await.unwrap();
    let names: Vec<&str> = top_three.iter().map(|p| p.product_name.as_str()).collect();
    assert_eq!(names, ["Product 12", "Product 11", "Product 10"]);

    let odd = service
        .top_products_by_category(&range, "Odd", None)
        .await
        .unwrap();
    assert_eq!(odd.len(), 6);
    assert_eq!(odd[0].product_name, "Product 11");

    let west = service
        .top_products_by_region(&range, "West", None)
        .await
        .unwrap();
    assert_eq!(west.len(), 10);
}

#[tokio::test]
async fn test_unknown_category_and_region_are_empty() {
    let (_fixture, service) = scenario_service().await;
    let range = year_2021();

    assert!(service
        .top_products_by_category(&range, "Garden", None)
        .await
        .unwrap()
        .is_empty());
    assert!(service
        .top_products_by_region(&range, "", None)
        .await
        .unwrap()
        .is_empty());

    let east = service
        .top_products_by_region(&range, "East", None)
        .await
        .unwrap();
    assert_eq!(east[0].quantity_sold, 3);
}

#[tokio::test]
async fn test_average_order_value() {
    let (_fixture, service) = scenario_service().await;

    assert!(approx(
        service.average_order_value(&year_2021()).await.unwrap(),
        25.0
    ));

    let err = service
        .average_order_value(&DateRange::new("2030-01-01", "2030-12-31"))
        .await
        .unwrap_err();
    assert!(matches!(err, SalesError::NoData));
    assert_eq!(err.to_string(), "no data found");
}

#[tokio::test]
async fn test_repeat_customer_counted_once() {
    let fixture = TestFixture::new();
    let rows = [
        sales_row("O1", "P1", "C1", "Widget", "Toys", "West", "2021-01-10", "1", "1.0"),
        sales_row("O2", "P2", "C1", "Hammer", "Tools", "West", "2021-02-10", "1", "1.0"),
        sales_row("O3", "P2", "C2", "Hammer", "Tools", "West", "2023-02-10", "1", "1.0"),
    ];
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    refresh_data(&fixture.session, fixture.write_csv("repeat.csv", &rows))
        .await
        .unwrap();
    let service = MetricsService::new(fixture.session.clone());

    assert_eq!(service.total_customers(&year_2021()).await.unwrap(), 1);
    assert_eq!(
        service.total_customers(&DateRange::default()).await.unwrap(),
        2
    );
}
