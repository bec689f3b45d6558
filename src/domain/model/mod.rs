pub mod customer;
pub mod delivery;
pub mod menu;
pub mod order;
pub mod overrides;
pub mod runtime_status;
pub mod session;

pub mod prelude {
    pub use super::customer::{CustomerDirectory, CustomerRecord};
    pub use super::delivery::{DeliveryConfig, DeliveryZone, Sla};
    pub use super::menu::{MenuIndex, MenuItem};
    pub use super::order::Order;
    pub use super::overrides::{IsOpenOverride, Overrides};
    pub use super::runtime_status::RuntimeStatus;
    pub use super::session::{CallSession, CustomerDraft, Fulfilment, OrderItem, Payment};
}
