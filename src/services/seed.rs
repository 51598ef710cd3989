//! Optional startup seeding for local development (`SEED_DB=true`).
//! Inserts a verified demo supplier and a small starter catalog, but only
//! when the products table is empty, so reruns are harmless.

use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::Result;

const DEMO_PRODUCTS: &[(&str, &str, &str, i32, i32)] = &[
  ("Organic Carrots", "vegetables", "kg", 350, 120),
  ("Cherry Tomatoes", "vegetables", "box", 899, 60),
  ("Red Apples", "fruits", "kg", 499, 200),
  ("Fresh Basil", "herbs", "bunch", 250, 45),
  ("Free-range Eggs", "dairy_eggs", "dozen", 1199, 80),
];

#[instrument(name = "seed::demo_catalog", skip(pool))]
pub async fn seed_demo_catalog(pool: &PgPool) -> Result<()> {
  let has_products: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products)")
    .fetch_one(pool)
    .await?;
  if has_products {
    info!("Products table is not empty; skipping demo seed.");
    return Ok(());
  }

  let supplier_id = Uuid::new_v4();
  sqlx::query(
    "INSERT INTO profiles (id, full_name, user_type, is_verified) \
     VALUES ($1, 'HortiBox Demo Farm', 'supplier', TRUE) \
     ON CONFLICT (id) DO NOTHING",
  )
  .bind(supplier_id)
  .execute(pool)
  .await?;

  let names: Vec<&str> = DEMO_PRODUCTS.iter().map(|p| p.0).collect();
  let categories: Vec<&str> = DEMO_PRODUCTS.iter().map(|p| p.1).collect();
  let units: Vec<&str> = DEMO_PRODUCTS.iter().map(|p| p.2).collect();
  let prices: Vec<i32> = DEMO_PRODUCTS.iter().map(|p| p.3).collect();
  let stocks: Vec<i32> = DEMO_PRODUCTS.iter().map(|p| p.4).collect();

  sqlx::query(
    "INSERT INTO products (name, category, unit, price_cents, stock_quantity, supplier_id) \
     SELECT u.name, u.category, u.unit, u.price_cents, u.stock_quantity, $1 \
     FROM UNNEST($2::text[], $3::text[], $4::text[], $5::int4[], $6::int4[]) \
       AS u(name, category, unit, price_cents, stock_quantity)",
  )
  .bind(supplier_id)
  .bind(&names)
  .bind(&categories)
  .bind(&units)
  .bind(&prices)
  .bind(&stocks)
  .execute(pool)
  .await?;

  info!("Seeded demo supplier {} with {} products.", supplier_id, DEMO_PRODUCTS.len());
  Ok(())
}
