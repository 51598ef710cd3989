use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::product::{Product, PRODUCT_COLUMNS};
use crate::services::pricing::{self, PricedLine};
use crate::state::AppState;

// --- Request/Response DTOs ---

#[derive(Deserialize, Debug)]
pub struct QuoteItem {
  pub product_id: Uuid,
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct QuoteRequestPayload {
  pub items: Vec<QuoteItem>,
}

#[derive(Serialize, Debug)]
pub struct QuoteLine {
  pub product_id: Uuid,
  pub name: String,
  pub unit_price_cents: i32,
  pub quantity: i32,
  pub line_total_cents: i64,
}

#[derive(Serialize, Debug)]
pub struct QuoteResponse {
  pub items: Vec<QuoteLine>,
  pub subtotal_cents: i64,
  pub delivery_fee_cents: i64,
  pub total_cents: i64,
  /// Present while delivery is still charged; how far from free delivery.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub amount_to_free_delivery_cents: Option<i64>,
}

// --- Handler Implementation ---

/// Prices a cart at current catalog prices. The cart itself lives in the
/// client; this endpoint only does the derived math.
#[instrument(name = "handler::quote_cart", skip(app_state, payload), fields(line_count = payload.items.len()))]
pub async fn quote_cart_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<QuoteRequestPayload>,
) -> Result<HttpResponse, AppError> {
  if payload.items.is_empty() {
    return Err(AppError::Validation("Cart is empty.".to_string()));
  }
  if payload.items.iter().any(|line| line.quantity <= 0) {
    return Err(AppError::Validation("Quantity must be a positive number.".to_string()));
  }

  let mut product_ids: Vec<Uuid> = payload.items.iter().map(|line| line.product_id).collect();
  product_ids.sort_unstable();
  product_ids.dedup();

  let products: Vec<Product> = sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"))
    .bind(&product_ids)
    .fetch_all(&app_state.db_pool)
    .await?;
  let products_by_id: HashMap<Uuid, Product> = products.into_iter().map(|p| (p.id, p)).collect();

  let mut lines = Vec::with_capacity(payload.items.len());
  let mut priced_lines = Vec::with_capacity(payload.items.len());
  for requested in &payload.items {
    let Some(product) = products_by_id.get(&requested.product_id) else {
      warn!("Cart references unknown product {}.", requested.product_id);
      return Err(AppError::NotFound(format!(
        "Product with ID {} not found.",
        requested.product_id
      )));
    };
    let priced = PricedLine {
      unit_price_cents: product.price_cents,
      quantity: requested.quantity,
    };
    lines.push(QuoteLine {
      product_id: product.id,
      name: product.name.clone(),
      unit_price_cents: product.price_cents,
      quantity: requested.quantity,
      line_total_cents: priced.line_total_cents(),
    });
    priced_lines.push(priced);
  }

  let subtotal_cents = pricing::subtotal_cents(&priced_lines);
  let delivery_fee_cents = pricing::delivery_fee_cents(subtotal_cents);
  let total_cents = pricing::total_cents(subtotal_cents);

  info!(
    "Quoted cart: subtotal {} + fee {} = {} cents.",
    subtotal_cents, delivery_fee_cents, total_cents
  );

  Ok(HttpResponse::Ok().json(QuoteResponse {
    items: lines,
    subtotal_cents,
    delivery_fee_cents,
    total_cents,
    amount_to_free_delivery_cents: pricing::amount_to_free_delivery_cents(subtotal_cents),
  }))
}
