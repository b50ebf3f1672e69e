use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Color, DimensionTier, FurnitureType, Material};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_price: Decimal,
    pub material_extra: Decimal,
    pub color_extra: Decimal,
    pub dimension_factor: Decimal,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub total_price: Decimal,
}

/// unit = (base + material extra + color extra) * dimension factor; total = unit * quantity.
pub fn price_configuration(
    catalog: &Catalog,
    furniture_type: FurnitureType,
    material: Material,
    color: Color,
    dimension: DimensionTier,
    quantity: u32,
) -> PriceBreakdown {
    let base_price = catalog.furniture(furniture_type).base_price;
    let material_extra = catalog.material(material).extra_price;
    let color_extra = catalog.color(color).extra_price;
    let dimension_factor = catalog.dimension(dimension).factor;

    let unit_price = (base_price + material_extra + color_extra) * dimension_factor;
    let total_price = unit_price * Decimal::from(quantity);

    PriceBreakdown {
        base_price,
        material_extra,
        color_extra,
        dimension_factor,
        unit_price,
        quantity,
        total_price,
    }
}

/// Rounds to cents and pins the scale so `350` renders as `350.00`.
pub fn money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded
}
