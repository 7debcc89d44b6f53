pub mod order;
pub mod status;

pub use order::{NewOrder, Order, OrderStatusView};
pub use status::OrderStatus;
