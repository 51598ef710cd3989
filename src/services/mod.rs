//! Domain services: pricing math, order persistence and the supplier
//! sales aggregation. Handlers stay thin and call into these.

pub mod orders;
pub mod pricing;
pub mod sales;
pub mod seed;
