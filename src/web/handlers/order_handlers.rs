use actix_web::{web, HttpResponse};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::orders::{self, NewOrder, OrderScope};
use crate::services::sales;
use crate::state::AppState;

#[instrument(name = "handler::create_order", skip(app_state, payload), fields(customer_id = %payload.customer_id))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewOrder>,
) -> Result<HttpResponse, AppError> {
  let order = orders::create_order(&app_state.db_pool, &payload).await?;
  Ok(HttpResponse::Created().json(order))
}

#[instrument(name = "handler::list_all_orders", skip(app_state))]
pub async fn list_all_orders_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let orders = orders::list_orders(&app_state.db_pool, OrderScope::All).await?;
  info!("Fetched {} orders.", orders.len());
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::list_customer_orders", skip(app_state, path), fields(customer_id = %path.as_ref()))]
pub async fn list_customer_orders_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let customer_id = path.into_inner();
  let orders = orders::list_orders(&app_state.db_pool, OrderScope::Customer(customer_id)).await?;
  info!("Fetched {} orders for customer {}.", orders.len(), customer_id);
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::supplier_sales", skip(app_state, path), fields(supplier_id = %path.as_ref()))]
pub async fn supplier_sales_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let supplier_id = path.into_inner();
  let report = sales::supplier_sales_report(&app_state.db_pool, supplier_id).await?;
  Ok(HttpResponse::Ok().json(report))
}
