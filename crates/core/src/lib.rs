pub mod audit;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod orders;

pub use audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
pub use catalog::pricing::{money, price_configuration, PriceBreakdown};
pub use catalog::{Catalog, CatalogError, CatalogTag, Color, DimensionTier, FurnitureType, Material};
pub use config::{AppConfig, ConfigError, LoadOptions, LogFormat};
pub use domain::{FieldValue, ItemAttributes, ItemField, Order, OrderItem, PendingItem, SessionId};
pub use errors::{ApplicationError, DomainError};
pub use flows::{
    DialogueAction, DialogueContext, DialogueSignal, DialogueState, FlowEngine,
    FlowTransitionError, GuidedOrderFlow,
};
pub use orders::{OrderExport, OrderManager};
