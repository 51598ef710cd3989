use actix_web::web;

// Liveness probe. A real deployment might also check DB connectivity here.
async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    // Health Check Route
    .route("/health", web::get().to(health_check_handler))
    // Product Routes
    .service(
      web::scope("/products")
        .route(
          "",
          web::get().to(crate::web::handlers::product_handlers::list_products_handler),
        )
        .route(
          "",
          web::post().to(crate::web::handlers::product_handlers::create_product_handler),
        )
        // Registered before `/{product_id}` so "supplier" is never captured as an id.
        .route(
          "/supplier/{supplier_id}",
          web::get().to(crate::web::handlers::product_handlers::list_products_by_supplier_handler),
        )
        .route(
          "/{product_id}",
          web::get().to(crate::web::handlers::product_handlers::get_product_handler),
        )
        .route(
          "/{product_id}",
          web::patch().to(crate::web::handlers::product_handlers::update_product_handler),
        )
        .route(
          "/{product_id}",
          web::delete().to(crate::web::handlers::product_handlers::delete_product_handler),
        ),
    )
    // Order Routes
    .service(
      web::scope("/orders")
        .route(
          "",
          web::post().to(crate::web::handlers::order_handlers::create_order_handler),
        )
        .route(
          "",
          web::get().to(crate::web::handlers::order_handlers::list_all_orders_handler),
        )
        .route(
          "/customer/{customer_id}",
          web::get().to(crate::web::handlers::order_handlers::list_customer_orders_handler),
        )
        .route(
          "/supplier/{supplier_id}/sales",
          web::get().to(crate::web::handlers::order_handlers::supplier_sales_handler),
        ),
    )
    // Cart Routes (pricing only; the cart itself is client state)
    .service(web::scope("/cart").route(
      "/quote",
      web::post().to(crate::web::handlers::cart_handlers::quote_cart_handler),
    ));
}
