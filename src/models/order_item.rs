use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::product::Product;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub price_at_purchase_cents: i32,
  // created_at/updated_at not needed for immutable line items
}

/// Line item with the current catalog row attached. `product` is `None`
/// when the product has been deleted since the purchase; the price paid is
/// preserved on the item itself.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemWithProduct {
  #[serde(flatten)]
  pub item: OrderItem,
  pub product: Option<Product>,
}
