use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>, // Description can be optional
  pub price_cents: i32,
  pub image_url: Option<String>,
  pub category: Option<String>,
  pub stock_quantity: i32,
  pub unit: Option<String>, // e.g. "kg", "bunch", "box"
  pub supplier_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Column list shared by every product query so the SELECTs stay in sync
/// with the `FromRow` derive above.
pub const PRODUCT_COLUMNS: &str =
  "id, name, description, price_cents, image_url, category, stock_quantity, unit, supplier_id, created_at, updated_at";
