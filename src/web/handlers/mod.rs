// Declare handler modules
pub mod cart_handlers;
pub mod order_handlers;
pub mod product_handlers;
