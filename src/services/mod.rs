pub mod lifecycle;

pub use lifecycle::OrderLifecycle;
