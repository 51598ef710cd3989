//! Supplier sales reporting.
//!
//! An order counts towards a supplier when at least one of its line items
//! references one of the supplier's products; revenue is attributed only
//! to the supplier's own line items.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::Result;
use crate::models::order::{OrderStatus, OrderWithItems};
use crate::services::orders::{self, OrderScope};

/// Window for the revenue figure.
const REVENUE_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SalesReport {
  pub revenue_last_30_days_cents: i64,
  pub completed_sales: u32,
  pub pending_payment: u32,
}

/// Loads the supplier's catalog and all orders, then aggregates.
#[instrument(name = "sales::supplier_sales_report", skip(pool), fields(supplier_id = %supplier_id))]
pub async fn supplier_sales_report(pool: &PgPool, supplier_id: Uuid) -> Result<SalesReport> {
  let product_ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM products WHERE supplier_id = $1")
    .bind(supplier_id)
    .fetch_all(pool)
    .await?;
  let supplier_products: HashSet<Uuid> = product_ids.into_iter().collect();

  let all_orders = orders::list_orders(pool, OrderScope::All).await?;
  let report = compute_sales_report(&supplier_products, &all_orders, Utc::now());

  info!(
    "Sales report for supplier {}: {} completed, {} pending payment.",
    supplier_id, report.completed_sales, report.pending_payment
  );
  Ok(report)
}

/// Pure aggregation over already-loaded rows.
pub fn compute_sales_report(
  supplier_products: &HashSet<Uuid>,
  all_orders: &[OrderWithItems],
  now: DateTime<Utc>,
) -> SalesReport {
  let window_start = now - Duration::days(REVENUE_WINDOW_DAYS);

  let mut revenue: i64 = 0;
  let mut completed: u32 = 0;
  let mut pending: u32 = 0;

  for entry in all_orders {
    let supplier_items: Vec<_> = entry
      .order_items
      .iter()
      .filter(|line| supplier_products.contains(&line.item.product_id))
      .collect();
    if supplier_items.is_empty() {
      continue;
    }

    match entry.order.status {
      OrderStatus::Delivered => {
        completed += 1;
        if entry.order.created_at > window_start {
          revenue += supplier_items
            .iter()
            .map(|line| i64::from(line.item.price_at_purchase_cents) * i64::from(line.item.quantity))
            .sum::<i64>();
        }
      }
      OrderStatus::PendingPayment => pending += 1,
      _ => {}
    }
  }

  SalesReport {
    revenue_last_30_days_cents: revenue,
    completed_sales: completed,
    pending_payment: pending,
  }
}
