pub mod list_orders;
pub mod submit_order;
