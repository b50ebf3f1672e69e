use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::catalog::{Color, DimensionTier, FurnitureType, Material};
use crate::errors::DomainError;
use crate::flows::DialogueState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    FurnitureType,
    Material,
    Color,
    Dimension,
}

/// A single typed value for one field of the item under construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    FurnitureType(FurnitureType),
    Material(Material),
    Color(Color),
    Dimension(DimensionTier),
}

impl FieldValue {
    pub fn field(&self) -> ItemField {
        match self {
            Self::FurnitureType(_) => ItemField::FurnitureType,
            Self::Material(_) => ItemField::Material,
            Self::Color(_) => ItemField::Color,
            Self::Dimension(_) => ItemField::Dimension,
        }
    }
}

/// Optional material/color/dimension values recognised in one message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAttributes {
    pub material: Option<Material>,
    pub color: Option<Color>,
    pub dimension: Option<DimensionTier>,
}

impl ItemAttributes {
    pub fn is_empty(&self) -> bool {
        self.material.is_none() && self.color.is_none() && self.dimension.is_none()
    }

    /// Present values in catalog order (material, color, dimension).
    pub fn values(&self) -> Vec<FieldValue> {
        let mut values = Vec::with_capacity(3);
        if let Some(material) = self.material {
            values.push(FieldValue::Material(material));
        }
        if let Some(color) = self.color {
            values.push(FieldValue::Color(color));
        }
        if let Some(dimension) = self.dimension {
            values.push(FieldValue::Dimension(dimension));
        }
        values
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingItem {
    pub furniture_type: FurnitureType,
    pub material: Option<Material>,
    pub color: Option<Color>,
    pub dimension: Option<DimensionTier>,
    pub quantity: u32,
}

impl PendingItem {
    pub fn new(furniture_type: FurnitureType, quantity: u32) -> Self {
        Self {
            furniture_type,
            material: None,
            color: None,
            dimension: None,
            quantity: quantity.max(1),
        }
    }

    pub fn with_attributes(mut self, attributes: ItemAttributes) -> Self {
        self.apply(attributes);
        self
    }

    pub fn set(&mut self, value: FieldValue) {
        match value {
            FieldValue::FurnitureType(furniture_type) => self.furniture_type = furniture_type,
            FieldValue::Material(material) => self.material = Some(material),
            FieldValue::Color(color) => self.color = Some(color),
            FieldValue::Dimension(dimension) => self.dimension = Some(dimension),
        }
    }

    pub fn apply(&mut self, attributes: ItemAttributes) {
        for value in attributes.values() {
            self.set(value);
        }
    }

    pub fn attributes(&self) -> ItemAttributes {
        ItemAttributes { material: self.material, color: self.color, dimension: self.dimension }
    }

    pub fn has_attributes(&self) -> bool {
        self.material.is_some() || self.color.is_some() || self.dimension.is_some()
    }

    pub fn missing_fields(&self) -> Vec<ItemField> {
        let mut missing = Vec::new();
        if self.material.is_none() {
            missing.push(ItemField::Material);
        }
        if self.color.is_none() {
            missing.push(ItemField::Color);
        }
        if self.dimension.is_none() {
            missing.push(ItemField::Dimension);
        }
        missing
    }

    pub fn next_missing(&self) -> Option<ItemField> {
        self.missing_fields().first().copied()
    }

    pub fn to_order_item(&self) -> Result<OrderItem, DomainError> {
        match (self.material, self.color, self.dimension) {
            (Some(material), Some(color), Some(dimension)) => Ok(OrderItem {
                furniture_type: self.furniture_type,
                material,
                color,
                dimension,
                quantity: self.quantity,
            }),
            _ => Err(DomainError::IncompleteItem { missing: self.missing_fields() }),
        }
    }
}

/// A committed cart line. Equal tags and quantity mean the same logical item,
/// but duplicates stay separate lines.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderItem {
    pub furniture_type: FurnitureType,
    pub material: Material,
    pub color: Color,
    pub dimension: DimensionTier,
    pub quantity: u32,
}

#[derive(Clone, Debug)]
pub struct Order {
    pub items: Vec<OrderItem>,
    pub pending: Option<PendingItem>,
    pub customer_name: Option<String>,
    pub contact_email: Option<SecretString>,
    pub state: DialogueState,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            pending: None,
            customer_name: None,
            contact_email: None,
            state: DialogueState::Start,
            created_at: Utc::now(),
        }
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}
