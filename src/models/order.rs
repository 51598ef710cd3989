use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

use crate::models::order_item::OrderItemWithProduct;

// Matches the `order_status` enum in schema.sql. The API never mutates an
// order's status; it is moved along externally (payment/fulfilment tooling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  PendingPayment,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
  Refunded,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub customer_id: Uuid,
  pub status: OrderStatus,
  pub total_amount_cents: i64,
  pub shipping_address_line1: String,
  pub shipping_city: String,
  pub shipping_state: String,
  pub shipping_postal_code: String,
  pub shipping_country: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Column list shared by the order queries.
pub const ORDER_COLUMNS: &str = "id, customer_id, status, total_amount_cents, shipping_address_line1, \
   shipping_city, shipping_state, shipping_postal_code, shipping_country, created_at, updated_at";

/// Read shape for the order listings: the order row plus the customer's
/// display name (from the externally-owned profiles table) and its line
/// items with product snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
  #[serde(flatten)]
  pub order: Order,
  pub customer_name: Option<String>,
  pub order_items: Vec<OrderItemWithProduct>,
}
