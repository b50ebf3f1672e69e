pub mod order;
pub mod session;

pub use order::{FieldValue, ItemAttributes, ItemField, Order, OrderItem, PendingItem};
pub use session::SessionId;
