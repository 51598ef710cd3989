//! Order persistence and the composite order listing reads.
//!
//! The order row and its line items are written in two independent calls,
//! without a wrapping transaction. A failed item insert therefore leaves
//! the order row behind; the caller only sees the database error. This
//! mirrors the storefront's checkout contract.

use std::collections::HashMap;

use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::order::{Order, OrderWithItems, ORDER_COLUMNS};
use crate::models::order_item::{OrderItem, OrderItemWithProduct};
use crate::models::product::{Product, PRODUCT_COLUMNS};

// Qualified variant of ORDER_COLUMNS for the profiles join, where `id` and
// `created_at` exist on both tables.
const QUALIFIED_ORDER_COLUMNS: &str = "o.id, o.customer_id, o.status, o.total_amount_cents, \
   o.shipping_address_line1, o.shipping_city, o.shipping_state, o.shipping_postal_code, \
   o.shipping_country, o.created_at, o.updated_at";

#[derive(Debug, Deserialize)]
pub struct ShippingDetails {
  pub shipping_address_line1: String,
  pub shipping_city: String,
  pub shipping_state: String,
  pub shipping_postal_code: String,
  pub shipping_country: String,
}

#[derive(Debug, Deserialize)]
pub struct NewOrderItem {
  pub product_id: Uuid,
  pub quantity: i32,
  pub price_at_purchase_cents: i32,
}

/// Checkout request body: order header fields plus the items array.
#[derive(Debug, Deserialize)]
pub struct NewOrder {
  pub customer_id: Uuid,
  pub total_amount_cents: i64,
  pub shipping: ShippingDetails,
  pub items: Vec<NewOrderItem>,
}

/// Which orders a listing should cover.
#[derive(Debug, Clone, Copy)]
pub enum OrderScope {
  /// Every order in the system (admin oversight).
  All,
  /// Orders placed by one customer.
  Customer(Uuid),
}

#[derive(sqlx::FromRow)]
struct OrderListRow {
  #[sqlx(flatten)]
  order: Order,
  full_name: Option<String>,
}

/// Creates the order row, then bulk-inserts its items in a second call.
#[instrument(name = "orders::create_order", skip(pool, new_order), fields(customer_id = %new_order.customer_id, item_count = new_order.items.len()))]
pub async fn create_order(pool: &PgPool, new_order: &NewOrder) -> Result<Order> {
  if new_order.items.is_empty() {
    return Err(AppError::Validation("An order must contain at least one item.".to_string()));
  }
  if new_order.items.iter().any(|item| item.quantity <= 0) {
    return Err(AppError::Validation("Item quantity must be a positive number.".to_string()));
  }
  if new_order.total_amount_cents < 0 {
    return Err(AppError::Validation("Order total must not be negative.".to_string()));
  }

  let order: Order = sqlx::query_as(&format!(
    "INSERT INTO orders (customer_id, total_amount_cents, shipping_address_line1, shipping_city, \
       shipping_state, shipping_postal_code, shipping_country) \
     VALUES ($1, $2, $3, $4, $5, $6, $7) \
     RETURNING {ORDER_COLUMNS}"
  ))
  .bind(new_order.customer_id)
  .bind(new_order.total_amount_cents)
  .bind(&new_order.shipping.shipping_address_line1)
  .bind(&new_order.shipping.shipping_city)
  .bind(&new_order.shipping.shipping_state)
  .bind(&new_order.shipping.shipping_postal_code)
  .bind(&new_order.shipping.shipping_country)
  .fetch_one(pool)
  .await?;

  let product_ids: Vec<Uuid> = new_order.items.iter().map(|item| item.product_id).collect();
  let quantities: Vec<i32> = new_order.items.iter().map(|item| item.quantity).collect();
  let prices: Vec<i32> = new_order.items.iter().map(|item| item.price_at_purchase_cents).collect();

  // Second, unguarded write. No rollback of the order row on failure.
  sqlx::query(
    "INSERT INTO order_items (order_id, product_id, quantity, price_at_purchase_cents) \
     SELECT $1, u.product_id, u.quantity, u.price_at_purchase_cents \
     FROM UNNEST($2::uuid[], $3::int4[], $4::int4[]) AS u(product_id, quantity, price_at_purchase_cents)",
  )
  .bind(order.id)
  .bind(&product_ids)
  .bind(&quantities)
  .bind(&prices)
  .execute(pool)
  .await?;

  info!(order_id = %order.id, "Order created with {} items.", new_order.items.len());
  Ok(order)
}

/// Fetches orders (newest first) together with their items, product
/// snapshots and the customer's display name.
#[instrument(name = "orders::list_orders", skip(pool))]
pub async fn list_orders(pool: &PgPool, scope: OrderScope) -> Result<Vec<OrderWithItems>> {
  let rows: Vec<OrderListRow> = match scope {
    OrderScope::All => {
      sqlx::query_as(&format!(
        "SELECT {QUALIFIED_ORDER_COLUMNS}, p.full_name \
         FROM orders o LEFT JOIN profiles p ON p.id = o.customer_id \
         ORDER BY o.created_at DESC"
      ))
      .fetch_all(pool)
      .await?
    }
    OrderScope::Customer(customer_id) => {
      sqlx::query_as(&format!(
        "SELECT {QUALIFIED_ORDER_COLUMNS}, p.full_name \
         FROM orders o LEFT JOIN profiles p ON p.id = o.customer_id \
         WHERE o.customer_id = $1 \
         ORDER BY o.created_at DESC"
      ))
      .bind(customer_id)
      .fetch_all(pool)
      .await?
    }
  };

  if rows.is_empty() {
    return Ok(Vec::new());
  }

  let order_ids: Vec<Uuid> = rows.iter().map(|row| row.order.id).collect();
  let items: Vec<OrderItem> = sqlx::query_as(
    "SELECT id, order_id, product_id, quantity, price_at_purchase_cents \
     FROM order_items WHERE order_id = ANY($1)",
  )
  .bind(&order_ids)
  .fetch_all(pool)
  .await?;

  let mut product_ids: Vec<Uuid> = items.iter().map(|item| item.product_id).collect();
  product_ids.sort_unstable();
  product_ids.dedup();

  let products: Vec<Product> = if product_ids.is_empty() {
    Vec::new()
  } else {
    sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"))
      .bind(&product_ids)
      .fetch_all(pool)
      .await?
  };

  let orders = rows.into_iter().map(|row| (row.order, row.full_name)).collect();
  Ok(assemble_orders(orders, items, products))
}

/// Groups flat item/product rows under their orders, preserving the order
/// of the `orders` slice.
fn assemble_orders(
  orders: Vec<(Order, Option<String>)>,
  items: Vec<OrderItem>,
  products: Vec<Product>,
) -> Vec<OrderWithItems> {
  let products_by_id: HashMap<Uuid, Product> = products.into_iter().map(|p| (p.id, p)).collect();

  let mut items_by_order: HashMap<Uuid, Vec<OrderItemWithProduct>> = HashMap::new();
  for item in items {
    let product = products_by_id.get(&item.product_id).cloned();
    items_by_order
      .entry(item.order_id)
      .or_default()
      .push(OrderItemWithProduct { item, product });
  }

  orders
    .into_iter()
    .map(|(order, customer_name)| {
      let order_items = items_by_order.remove(&order.id).unwrap_or_default();
      OrderWithItems {
        order,
        customer_name,
        order_items,
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::order::OrderStatus;
  use chrono::Utc;

  fn order(id: Uuid, customer_id: Uuid) -> Order {
    Order {
      id,
      customer_id,
      status: OrderStatus::PendingPayment,
      total_amount_cents: 4_200,
      shipping_address_line1: "Rua Exemplo, 123".to_string(),
      shipping_city: "São Paulo".to_string(),
      shipping_state: "SP".to_string(),
      shipping_postal_code: "01234-567".to_string(),
      shipping_country: "Brasil".to_string(),
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  fn item(order_id: Uuid, product_id: Uuid) -> OrderItem {
    OrderItem {
      id: Uuid::new_v4(),
      order_id,
      product_id,
      quantity: 2,
      price_at_purchase_cents: 350,
    }
  }

  fn product(id: Uuid) -> Product {
    Product {
      id,
      name: "Organic Carrots".to_string(),
      description: None,
      price_cents: 350,
      image_url: None,
      category: Some("vegetables".to_string()),
      stock_quantity: 40,
      unit: Some("kg".to_string()),
      supplier_id: Uuid::new_v4(),
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn items_are_grouped_under_their_orders() {
    let customer = Uuid::new_v4();
    let (order_a, order_b) = (Uuid::new_v4(), Uuid::new_v4());
    let product_id = Uuid::new_v4();

    let orders = vec![
      (order(order_a, customer), Some("Maria Silva".to_string())),
      (order(order_b, customer), Some("Maria Silva".to_string())),
    ];
    let items = vec![item(order_a, product_id), item(order_a, product_id), item(order_b, product_id)];
    let products = vec![product(product_id)];

    let assembled = assemble_orders(orders, items, products);
    assert_eq!(assembled.len(), 2);
    assert_eq!(assembled[0].order.id, order_a);
    assert_eq!(assembled[0].order_items.len(), 2);
    assert_eq!(assembled[1].order_items.len(), 1);
    assert_eq!(assembled[0].customer_name.as_deref(), Some("Maria Silva"));
  }

  #[test]
  fn missing_product_yields_item_without_snapshot() {
    let order_id = Uuid::new_v4();
    let orders = vec![(order(order_id, Uuid::new_v4()), None)];
    let items = vec![item(order_id, Uuid::new_v4())];

    let assembled = assemble_orders(orders, items, Vec::new());
    assert_eq!(assembled[0].order_items.len(), 1);
    assert!(assembled[0].order_items[0].product.is_none());
    // The price paid is still carried on the item itself.
    assert_eq!(assembled[0].order_items[0].item.price_at_purchase_cents, 350);
  }

  #[test]
  fn order_without_items_gets_empty_vec() {
    let orders = vec![(order(Uuid::new_v4(), Uuid::new_v4()), None)];
    let assembled = assemble_orders(orders, Vec::new(), Vec::new());
    assert!(assembled[0].order_items.is_empty());
  }

  #[test]
  fn checkout_body_deserializes_with_nested_shipping() {
    let body = serde_json::json!({
      "customer_id": Uuid::new_v4(),
      "total_amount_cents": 15075,
      "shipping": {
        "shipping_address_line1": "Rua Exemplo, 123",
        "shipping_city": "São Paulo",
        "shipping_state": "SP",
        "shipping_postal_code": "01234-567",
        "shipping_country": "Brasil"
      },
      "items": [
        { "product_id": Uuid::new_v4(), "quantity": 2, "price_at_purchase_cents": 7537 }
      ]
    });

    let new_order: NewOrder = serde_json::from_value(body).unwrap();
    assert_eq!(new_order.items.len(), 1);
    assert_eq!(new_order.shipping.shipping_city, "São Paulo");
  }
}
