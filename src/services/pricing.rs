//! Cart pricing rules.
//!
//! Amounts are integer cents. Delivery is free strictly above the
//! threshold, otherwise a flat fee applies.

/// Subtotals above this ship for free.
pub const FREE_DELIVERY_THRESHOLD_CENTS: i64 = 5_000;

/// Flat delivery fee charged below (and at) the threshold.
pub const DELIVERY_FEE_CENTS: i64 = 1_000;

/// A cart line reduced to what pricing needs.
#[derive(Debug, Clone, Copy)]
pub struct PricedLine {
  pub unit_price_cents: i32,
  pub quantity: i32,
}

impl PricedLine {
  pub fn line_total_cents(&self) -> i64 {
    i64::from(self.unit_price_cents) * i64::from(self.quantity)
  }
}

pub fn subtotal_cents(lines: &[PricedLine]) -> i64 {
  lines.iter().map(PricedLine::line_total_cents).sum()
}

pub fn delivery_fee_cents(subtotal_cents: i64) -> i64 {
  if subtotal_cents > FREE_DELIVERY_THRESHOLD_CENTS {
    0
  } else {
    DELIVERY_FEE_CENTS
  }
}

pub fn total_cents(subtotal_cents: i64) -> i64 {
  subtotal_cents + delivery_fee_cents(subtotal_cents)
}

/// How much more the customer must add to ship for free. `None` once
/// delivery already is free.
pub fn amount_to_free_delivery_cents(subtotal_cents: i64) -> Option<i64> {
  if delivery_fee_cents(subtotal_cents) == 0 {
    None
  } else {
    Some((FREE_DELIVERY_THRESHOLD_CENTS - subtotal_cents).max(0))
  }
}
