//! Spanish Markdown texts sent back to the user.

use designbot_core::catalog::pricing::money;
use designbot_core::catalog::{Catalog, CatalogTag, FurnitureType};
use designbot_core::domain::{FieldValue, ItemField, OrderItem};
use designbot_core::flows::{DialogueState, PriceQuery};

pub const GREETING: &str =
    "¡Hola! 👋 Soy DesignBot, tu asistente para muebles personalizados. ¿Te gustaría diseñar algún mueble?";

pub const GENERIC_PROMPT: &str = "¿En qué más puedo ayudarte con tu pedido de muebles?";

const FURNITURE_OPTIONS: &str = "• Silla\n• Mesa\n• Sofá\n• Estantería\n• Escritorio";

pub const ADD_MORE_QUESTION: &str =
    "¿Te gustaría agregar otro mueble? (responde 'sí' para agregar más o 'no' para finalizar)";

pub const CONFIRM_QUESTION: &str =
    "¿Confirmamos el pedido? (responde 'sí' para confirmar o 'no' para seguir editando)";

pub const EMPTY_ORDER: &str =
    "No hay items en tu pedido para finalizar. ¿Te gustaría agregar algún mueble?";

pub const CONTACT_REPROMPT: &str = "Por favor, ingresa un email válido:";

pub const CANCELLED: &str =
    "🔄 **Pedido cancelado.** Empecemos de nuevo: ¿te gustaría diseñar algún mueble?";

pub const MODIFY_HELP: &str = "Para modificar tu pedido, puedes:\n\
    • 'Eliminar item X' (donde X es el número)\n\
    • 'Modificar item X a N unidades'";

pub const OFFER_CHANGES: &str = "De acuerdo, aún no confirmo el pedido. Puedes agregar otro mueble, \
    'eliminar item X' o 'modificar item X a N unidades'. Cuando estés listo, escribe 'terminar'.";

pub fn ask_for_field(field: ItemField, has_items: bool) -> String {
    match field {
        ItemField::FurnitureType if has_items => {
            format!("¡Perfecto! ¿Qué otro mueble te gustaría agregar?\n\n{FURNITURE_OPTIONS}")
        }
        ItemField::FurnitureType => {
            format!("¡Excelente! 🛋️ ¿Qué tipo de mueble te gustaría diseñar?\n\n{FURNITURE_OPTIONS}")
        }
        ItemField::Material => "¿Qué material prefieres?\n\n• Madera noble\n• MDF\n• Metal\n\
            • Vidrio\n• Bambú\n• Madera reciclada"
            .to_string(),
        ItemField::Color => {
            "¿Qué color prefieres?\n\n• Natural\n• Blanco\n• Negro\n• Madera oscura\n• Gris"
                .to_string()
        }
        ItemField::Dimension => "¿Qué dimensiones prefieres?\n\n\
            • **Pequeño** (80% del tamaño estándar)\n\
            • **Estándar** (tamaño normal)\n\
            • **Grande** (130% del tamaño estándar)"
            .to_string(),
    }
}

pub fn reprompt_field(field: ItemField) -> String {
    match field {
        ItemField::FurnitureType => {
            format!("No reconocí el tipo de mueble. Elige uno de estos:\n\n{FURNITURE_OPTIONS}")
        }
        ItemField::Material => {
            "Por favor, elige un material: Madera noble, MDF, Metal, Vidrio, Bambú o Madera reciclada"
                .to_string()
        }
        ItemField::Color => {
            "Por favor, elige un color: Natural, Blanco, Negro, Madera oscura o Gris".to_string()
        }
        ItemField::Dimension => "❌ No entendí la dimensión. Por favor elige entre:\n\n\
            • **Pequeño**\n• **Estándar**\n• **Grande**"
            .to_string(),
    }
}

/// One confirmation line per value just recorded on the item under construction.
pub fn acknowledge(values: &[FieldValue]) -> String {
    values
        .iter()
        .map(|value| match value {
            FieldValue::FurnitureType(kind) => format!("✅ **{} seleccionado**", kind.label()),
            FieldValue::Material(material) => {
                format!("✅ **Material {} seleccionado**", material.label())
            }
            FieldValue::Color(color) => format!("✅ **Color {} seleccionado**", color.label()),
            FieldValue::Dimension(tier) => {
                format!("✅ **Dimensión {} seleccionada**", tier.label())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn item_added(item: &OrderItem, summary: &str) -> String {
    format!(
        "✅ **{} {} agregado correctamente!** 🎉\n\n{summary}",
        item.furniture_type.label(),
        item.dimension.label()
    )
}

pub fn items_added(count: usize, summary: &str) -> String {
    format!("✅ **{count} productos agregados a tu pedido!** 🎉\n\n{summary}")
}

pub fn final_summary(summary: &str) -> String {
    format!("📦 **PEDIDO COMPLETO**\n\n{summary}\n\n¿Confirmamos el pedido? (responde 'sí' para confirmar)")
}

fn name_suffix(name: Option<&str>) -> String {
    name.map(|name| format!(", {name}")).unwrap_or_default()
}

pub fn ask_for_contact(name: Option<&str>) -> String {
    format!(
        "📧 **INFORMACIÓN DE CONTACTO**{}:\n\n¡Perfecto! Por favor, compártenos tu email para contactarte:",
        name_suffix(name)
    )
}

pub fn order_confirmed(name: Option<&str>, summary: &str, email: &str) -> String {
    format!(
        "🎉 **¡PEDIDO CONFIRMADO!** 🎉{}\n\n{summary}\n\n📧 **Email de contacto:** {email}\n\n\
         📅 **Proceso:**\n\
         1. Confirmación por email en 24 horas\n\
         2. Diseño técnico (2-3 días)\n\
         3. Fabricación (7-10 días)\n\
         4. Entrega programada\n\n\
         ¡Gracias por tu pedido! 🛋️",
        name_suffix(name)
    )
}

pub fn farewell(name: Option<&str>) -> String {
    format!(
        "¡Ha sido un gusto ayudarte{}! 😊 Espero verte pronto para tu próximo diseño de muebles. ¡Hasta luego!",
        name_suffix(name)
    )
}

pub fn acknowledge_name(name: &str) -> String {
    format!("¡Encantado de conocerte, {name}! 😊")
}

pub fn view_order(summary: &str, has_items: bool) -> String {
    if has_items {
        format!("📋 **TU PEDIDO ACTUAL:**\n\n{summary}\n\n¿Quieres agregar algo más o finalizar?")
    } else {
        "🛒 Tu pedido está vacío. ¿Te gustaría agregar algún mueble?".to_string()
    }
}

pub fn item_removed(position: usize, summary: &str) -> String {
    format!("✅ **Item {position} eliminado del pedido**\n\n{summary}")
}

pub fn quantity_changed(position: usize, quantity: u32, summary: &str) -> String {
    format!("✅ **Item {position} actualizado a {quantity} unidad(es)**\n\n{summary}")
}

pub fn nothing_changed(position: usize, summary: &str) -> String {
    format!("⚠️ No pude modificar el item {position}, tu pedido no cambió.\n\n{summary}")
}

fn indefinite_article(kind: FurnitureType) -> &'static str {
    match kind {
        FurnitureType::Silla | FurnitureType::Mesa | FurnitureType::Estanteria => "una",
        FurnitureType::Sofa | FurnitureType::Escritorio => "un",
    }
}

pub fn price_answer(catalog: &Catalog, query: &PriceQuery) -> String {
    let Some(kind) = query.furniture_type else {
        let mut answer = String::from("Te puedo ayudar con precios. Los precios base son:\n");
        for kind in FurnitureType::ALL {
            answer.push_str(&format!(
                "• {}: ${}\n",
                kind.label(),
                money(catalog.furniture(*kind).base_price)
            ));
        }
        answer.push_str("\n¿Te interesa algún tipo en particular?");
        return answer;
    };

    let mut answer = format!(
        "El precio base para {} {} es ${}. El precio final depende del material, color y dimensiones que elijas.",
        indefinite_article(kind),
        kind.label().to_lowercase(),
        money(catalog.furniture(kind).base_price)
    );
    if let Some(material) = query.material {
        answer.push_str(&format!(
            "\n• Material {}: +${}",
            material.label(),
            money(catalog.material(material).extra_price)
        ));
    }
    if let Some(color) = query.color {
        answer.push_str(&format!(
            "\n• Color {}: +${}",
            color.label(),
            money(catalog.color(color).extra_price)
        ));
    }
    answer
}

/// Fixed prompt repeated when a message moves nothing forward.
pub fn state_prompt(state: DialogueState, has_items: bool) -> String {
    match state {
        DialogueState::Start | DialogueState::Completed => GENERIC_PROMPT.to_string(),
        DialogueState::AwaitingType => ask_for_field(ItemField::FurnitureType, has_items),
        DialogueState::AwaitingMaterial => reprompt_field(ItemField::Material),
        DialogueState::AwaitingColor => reprompt_field(ItemField::Color),
        DialogueState::AwaitingDimension => reprompt_field(ItemField::Dimension),
        DialogueState::AddingMore => ADD_MORE_QUESTION.to_string(),
        DialogueState::Finalizing => CONFIRM_QUESTION.to_string(),
        DialogueState::AwaitingContact => CONTACT_REPROMPT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use designbot_core::catalog::{Catalog, Color, FurnitureType, Material};
    use designbot_core::domain::{FieldValue, ItemField};
    use designbot_core::flows::PriceQuery;

    use super::{acknowledge, ask_for_field, price_answer, reprompt_field};

    #[test]
    fn acknowledgements_stack_one_line_per_value() {
        let text = acknowledge(&[
            FieldValue::FurnitureType(FurnitureType::Sofa),
            FieldValue::Material(Material::MaderaMdf),
        ]);
        assert_eq!(text, "✅ **Sofá seleccionado**\n✅ **Material Madera Mdf seleccionado**");
    }

    #[test]
    fn prompts_list_catalog_options() {
        assert_eq!(
            ask_for_field(ItemField::Color, false),
            "¿Qué color prefieres?\n\n• Natural\n• Blanco\n• Negro\n• Madera oscura\n• Gris"
        );
        assert!(ask_for_field(ItemField::Material, false).ends_with("• Bambú\n• Madera reciclada"));
        assert!(reprompt_field(ItemField::Dimension).starts_with("❌ No entendí la dimensión."));
    }

    #[test]
    fn price_answer_includes_mentioned_surcharges() {
        let answer = price_answer(
            &Catalog::standard(),
            &PriceQuery {
                furniture_type: Some(FurnitureType::Sofa),
                material: Some(Material::Metal),
                color: Some(Color::Gris),
            },
        );
        assert!(answer.starts_with("El precio base para un sofá es $800.00."));
        assert!(answer.contains("• Material Metal: +$100.00"));
        assert!(answer.contains("• Color Gris: +$35.00"));
    }

    #[test]
    fn price_answer_without_type_lists_every_base_price() {
        let answer = price_answer(&Catalog::standard(), &PriceQuery::default());
        assert!(answer.contains("• Silla: $150.00\n"));
        assert!(answer.contains("• Escritorio: $400.00\n"));
    }
}
