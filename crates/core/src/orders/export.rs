use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Color, DimensionTier, FurnitureType, Material};
use crate::flows::DialogueState;

/// Structured snapshot of an order for external persistence or display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExport {
    pub customer: Option<String>,
    pub email: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub items: Vec<ExportedItem>,
    pub total: Decimal,
    pub state: DialogueState,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedItem {
    pub furniture_type: FurnitureType,
    pub material: Material,
    pub color: Color,
    pub dimension: DimensionTier,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}
