pub mod memory_store;
pub mod order_sink;
pub mod overrides_store;
pub mod redis_store;
pub mod session_store;
pub mod ttl_store;

pub use order_sink::OrderSink;
pub use overrides_store::OverrideStore;
pub use session_store::SessionStore;
pub use ttl_store::TtlStore;
