//! HortiBox backend API: products/orders REST layer plus cart pricing and
//! supplier sales reporting. Auth, profile mutation and file storage stay
//! with the hosted provider the frontend talks to directly.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;
