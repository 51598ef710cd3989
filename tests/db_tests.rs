//! Database-backed integration tests.
//!
//! These need a PostgreSQL instance with `schema.sql` applied and
//! `DATABASE_URL` pointing at it; they are `#[ignore]`d so the default
//! `cargo test` run stays database-free. Run them with:
//!
//! ```sh
//! DATABASE_URL=postgres://... cargo test -- --ignored
//! ```

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use hortibox_api::config::AppConfig;
use hortibox_api::services::seed;
use hortibox_api::state::AppState;
use hortibox_api::web::routes::configure_app_routes;

async fn db_state() -> AppState {
  let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for database tests");
  let config = AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    database_url: database_url.clone(),
    cors_allowed_origin: "http://localhost:3001".to_string(),
    seed_db: false,
  };
  let db_pool = PgPool::connect(&database_url).await.expect("database connection");
  AppState {
    db_pool,
    config: Arc::new(config),
  }
}

async fn insert_profile(pool: &PgPool, user_type: &str) -> Uuid {
  let id = Uuid::new_v4();
  sqlx::query("INSERT INTO profiles (id, full_name, user_type, is_verified) VALUES ($1, $2, $3, TRUE)")
    .bind(id)
    .bind(format!("Test {} {}", user_type, id.simple()))
    .bind(user_type)
    .execute(pool)
    .await
    .expect("profile insert");
  id
}

fn product_body(supplier_id: Uuid, name: &str) -> serde_json::Value {
  json!({
    "name": name,
    "price_cents": 350,
    "stock_quantity": 40,
    "category": "vegetables",
    "unit": "kg",
    "supplier_id": supplier_id,
  })
}

#[actix_rt::test]
#[ignore]
async fn created_product_appears_in_supplier_listing() {
  let state = db_state().await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let supplier_id = insert_profile(&state.db_pool, "supplier").await;

  let req = test::TestRequest::post()
    .uri("/products")
    .set_json(product_body(supplier_id, "Organic Carrots"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created: serde_json::Value = test::read_body_json(resp).await;
  let created_id = created["id"].as_str().expect("created product id").to_string();

  let req = test::TestRequest::get()
    .uri(&format!("/products/supplier/{}", supplier_id))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let listing: Vec<serde_json::Value> = test::read_body_json(resp).await;
  assert!(
    listing.iter().any(|p| p["id"] == created_id.as_str()),
    "created product must appear in its supplier's listing"
  );
}

#[actix_rt::test]
#[ignore]
async fn deleted_product_is_removed_and_second_delete_is_404() {
  let state = db_state().await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let supplier_id = insert_profile(&state.db_pool, "supplier").await;

  let req = test::TestRequest::post()
    .uri("/products")
    .set_json(product_body(supplier_id, "Cherry Tomatoes"))
    .to_request();
  let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
  let created_id = created["id"].as_str().expect("created product id").to_string();

  let req = test::TestRequest::delete()
    .uri(&format!("/products/{}", created_id))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let req = test::TestRequest::get()
    .uri(&format!("/products/supplier/{}", supplier_id))
    .to_request();
  let listing: Vec<serde_json::Value> = test::call_and_read_body_json(&app, req).await;
  assert!(
    listing.iter().all(|p| p["id"] != created_id.as_str()),
    "deleted product must not appear in the listing"
  );

  // Deleting again must be a 404.
  let req = test::TestRequest::delete()
    .uri(&format!("/products/{}", created_id))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
#[ignore]
async fn order_with_n_items_creates_n_order_item_rows() {
  let state = db_state().await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let customer_id = insert_profile(&state.db_pool, "customer").await;

  let items: Vec<serde_json::Value> = (0..3)
    .map(|i| {
      json!({
        "product_id": Uuid::new_v4(),
        "quantity": i + 1,
        "price_at_purchase_cents": 350 * (i + 1),
      })
    })
    .collect();

  let req = test::TestRequest::post()
    .uri("/orders")
    .set_json(json!({
      "customer_id": customer_id,
      "total_amount_cents": 3_100,
      "shipping": {
        "shipping_address_line1": "Rua Exemplo, 123",
        "shipping_city": "São Paulo",
        "shipping_state": "SP",
        "shipping_postal_code": "01234-567",
        "shipping_country": "Brasil"
      },
      "items": items,
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let order: serde_json::Value = test::read_body_json(resp).await;
  let order_id: Uuid = order["id"].as_str().expect("order id").parse().expect("order id uuid");
  assert_eq!(order["status"], "pending_payment");

  let row_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = $1")
    .bind(order_id)
    .fetch_one(&state.db_pool)
    .await
    .expect("order_items count");
  assert_eq!(row_count, 3, "one order_items row per submitted item");
}

#[actix_rt::test]
#[ignore]
async fn seed_demo_catalog_is_idempotent() {
  let state = db_state().await;

  seed::seed_demo_catalog(&state.db_pool).await.expect("first seed run");
  let count_after_first: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
    .fetch_one(&state.db_pool)
    .await
    .expect("product count");
  assert!(count_after_first > 0);

  // A second run must not add anything.
  seed::seed_demo_catalog(&state.db_pool).await.expect("second seed run");
  let count_after_second: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
    .fetch_one(&state.db_pool)
    .await
    .expect("product count");
  assert_eq!(count_after_first, count_after_second);
}
