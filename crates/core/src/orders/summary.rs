use std::fmt::Write;

use rust_decimal::Decimal;

use crate::catalog::pricing::{money, price_configuration};
use crate::catalog::{Catalog, CatalogTag};
use crate::domain::order::OrderItem;

pub const EMPTY_CART_SUMMARY: &str =
    "🛒 **Tu pedido está vacío**\n\n¡Agrega algunos productos para comenzar!";

/// `2x Silla Grande`
pub fn item_description(item: &OrderItem) -> String {
    format!("{}x {} {}", item.quantity, item.furniture_type.label(), item.dimension.label())
}

/// Markdown listing of the cart: 1-based lines with material, color, unit and
/// line price, then the grand total.
pub fn render_summary(catalog: &Catalog, items: &[OrderItem]) -> String {
    if items.is_empty() {
        return EMPTY_CART_SUMMARY.to_string();
    }

    let mut summary = String::from("📋 **RESUMEN DE TU PEDIDO**\n\n");
    let mut total = Decimal::ZERO;
    for (position, item) in items.iter().enumerate() {
        let price = price_configuration(
            catalog,
            item.furniture_type,
            item.material,
            item.color,
            item.dimension,
            item.quantity,
        );
        total += price.total_price;

        let _ = write!(
            summary,
            "{}. **{}**\n   📦 Material: {}\n   🎨 Color: {}\n   💰 ${} c/u → ${} total\n\n",
            position + 1,
            item_description(item),
            item.material.label(),
            item.color.label(),
            money(price.unit_price),
            money(price.total_price),
        );
    }

    let _ = write!(summary, "🎯 **TOTAL DEL PEDIDO: ${}**", money(total));
    summary
}
