//! Reads a classified, extracted message against the current dialogue state
//! and decides which [`DialogueSignal`] it carries. Nothing here mutates the
//! order; the flow engine and the session do that.

use designbot_core::domain::{ItemAttributes, PendingItem};
use designbot_core::flows::{DialogueSignal, DialogueState, PriceQuery};

use crate::classifier::Intent;
use crate::extractor::{ExtractedEntities, FurnitureMention};
use crate::synonyms::{self, Cue};

/// Phrases that wipe the order from any state.
const CANCEL_CUES: &[&str] = &["cancelar", "empezar de nuevo", "reiniciar", "nuevo pedido"];

const REMOVE_WORDS: &[&str] = &["eliminar", "quitar", "borrar"];

const DEFAULT_QUANTITY: u32 = 1;

pub fn interpret(
    text: &str,
    intent: Intent,
    entities: &ExtractedEntities,
    state: DialogueState,
    pending: Option<&PendingItem>,
) -> DialogueSignal {
    let normalized = entities.normalized.as_str();

    if state == DialogueState::AwaitingContact && looks_like_email(text) {
        return DialogueSignal::ContactProvided(text.trim().to_owned());
    }

    if CANCEL_CUES.iter().any(|cue| synonyms::contains_word(normalized, cue)) {
        return DialogueSignal::CancelRequested;
    }

    if intent == Intent::ViewOrder {
        return DialogueSignal::ViewRequested;
    }

    if intent == Intent::ModifyOrder {
        if let Some(signal) = modification(entities) {
            return signal;
        }
    }

    if intent == Intent::AskPrice {
        return DialogueSignal::PriceRequested(price_query(normalized));
    }

    if let Some(signal) = state_specific(intent, entities, state, pending) {
        return signal;
    }

    fallback(intent, entities)
}

/// Presence of both `@` and `.`; nothing stricter.
pub fn looks_like_email(text: &str) -> bool {
    text.contains('@') && text.contains('.')
}

/// The first embedded integer is the item position; a new quantity is only
/// read from the words after it.
fn modification(entities: &ExtractedEntities) -> Option<DialogueSignal> {
    let normalized = entities.normalized.as_str();
    let mut tokens = normalized.split_whitespace();
    let position = tokens.by_ref().find_map(position_token)?;

    if REMOVE_WORDS.iter().any(|word| normalized.contains(word)) {
        return Some(DialogueSignal::RemoveRequested { position });
    }

    let quantity = tokens.find_map(synonyms::parse_quantity_token);
    Some(match quantity {
        Some(quantity) => DialogueSignal::QuantityChangeRequested { position, quantity },
        None => DialogueSignal::ModifyUnspecified,
    })
}

fn position_token(token: &str) -> Option<usize> {
    token.trim_matches(|c: char| !c.is_ascii_digit()).parse().ok()
}

fn price_query(normalized: &str) -> PriceQuery {
    PriceQuery {
        furniture_type: synonyms::canonical_furniture(normalized).map(|(kind, _)| kind),
        material: synonyms::canonical_material(normalized).map(|(material, _)| material),
        color: synonyms::canonical_color(normalized).map(|(color, _)| color),
    }
}

fn state_specific(
    intent: Intent,
    entities: &ExtractedEntities,
    state: DialogueState,
    pending: Option<&PendingItem>,
) -> Option<DialogueSignal> {
    let slot_filling = state.expected_field().is_some();

    if !entities.mentions.is_empty() && (slot_filling || state.accepts_new_item()) {
        let same_type_as_pending = match (entities.mentions.as_slice(), pending) {
            ([mention], Some(pending)) => mention.furniture_type == pending.furniture_type,
            _ => false,
        };
        if !(slot_filling && same_type_as_pending) {
            return Some(DialogueSignal::NewItems(draft_items(entities)));
        }
    }

    match state {
        _ if slot_filling => {
            let attributes = synonyms::canonical_attributes(&entities.normalized);
            if !attributes.is_empty() {
                Some(DialogueSignal::FieldsProvided(attributes))
            } else if matches!(intent, Intent::Greet | Intent::Farewell) || entities.name().is_some()
            {
                None
            } else {
                Some(DialogueSignal::FieldUnrecognized)
            }
        }
        DialogueState::AddingMore | DialogueState::Finalizing => {
            let cue = synonyms::cue(&entities.normalized).or(match intent {
                Intent::StartOrder => Some(Cue::Affirmative),
                Intent::FinishOrder => Some(Cue::Negative),
                _ => None,
            });
            cue.map(|cue| match cue {
                Cue::Affirmative => DialogueSignal::Affirmative,
                Cue::Negative => DialogueSignal::Negative,
            })
        }
        DialogueState::AwaitingContact => Some(DialogueSignal::ContactInvalid),
        _ => None,
    }
}

fn fallback(intent: Intent, entities: &ExtractedEntities) -> DialogueSignal {
    if intent == Intent::Greet {
        return DialogueSignal::Greeting;
    }
    if let Some(name) = entities.name() {
        return DialogueSignal::NameIntroduced(name.to_owned());
    }
    match intent {
        Intent::StartOrder => DialogueSignal::OrderRequested,
        Intent::FinishOrder => DialogueSignal::FinishRequested,
        Intent::Farewell => DialogueSignal::Farewell,
        Intent::ModifyOrder => DialogueSignal::ModifyUnspecified,
        _ => DialogueSignal::Unrecognized,
    }
}

/// One draft per furniture mention. A mention's attributes come from the text
/// up to the next mention; the first mention also takes the text before it.
pub fn draft_items(entities: &ExtractedEntities) -> Vec<PendingItem> {
    let normalized = entities.normalized.as_str();
    let mentions = &entities.mentions;

    mentions
        .iter()
        .enumerate()
        .map(|(index, mention)| {
            let scope_start = if index == 0 { 0 } else { mention.start };
            let scope_end = mentions.get(index + 1).map_or(normalized.len(), |next| next.start);
            let attributes = normalized
                .get(scope_start..scope_end)
                .map(synonyms::canonical_attributes)
                .unwrap_or_default();

            let quantity = quantity_before(normalized, mention).unwrap_or_else(|| {
                if mentions.len() > 1 {
                    DEFAULT_QUANTITY
                } else {
                    entities
                        .quantity()
                        .or_else(|| synonyms::first_number_word(normalized))
                        .unwrap_or(DEFAULT_QUANTITY)
                }
            });

            PendingItem::new(mention.furniture_type, quantity).with_attributes(attributes)
        })
        .collect()
}

/// Digits or a number word immediately preceding the mention.
fn quantity_before(normalized: &str, mention: &FurnitureMention) -> Option<u32> {
    normalized
        .get(..mention.start)?
        .split_whitespace()
        .next_back()
        .and_then(synonyms::parse_quantity_token)
}

/// Fields a single-shot draft still lacks, taken from `defaults`.
pub fn fill_defaults(mut draft: PendingItem, defaults: ItemAttributes) -> PendingItem {
    draft.material = draft.material.or(defaults.material);
    draft.color = draft.color.or(defaults.color);
    draft.dimension = draft.dimension.or(defaults.dimension);
    draft
}

#[cfg(test)]
mod tests {
    use designbot_core::catalog::{Color, DimensionTier, FurnitureType, Material};
    use designbot_core::domain::{ItemAttributes, PendingItem};
    use designbot_core::flows::{DialogueSignal, DialogueState};

    use super::{draft_items, fill_defaults, interpret};
    use crate::classifier::IntentClassifier;
    use crate::extractor::EntityExtractor;

    fn signal(text: &str, state: DialogueState, pending: Option<&PendingItem>) -> DialogueSignal {
        let intent = IntentClassifier::new().classify(text);
        let entities = EntityExtractor::new().extract(text);
        interpret(text, intent, &entities, state, pending)
    }

    #[test]
    fn cancel_wins_over_everything_else() {
        assert_eq!(
            signal("cancelar y ver pedido", DialogueState::AwaitingColor, None),
            DialogueSignal::CancelRequested
        );
    }

    #[test]
    fn contact_needs_at_sign_and_dot() {
        assert_eq!(
            signal("  ana@correo.com ", DialogueState::AwaitingContact, None),
            DialogueSignal::ContactProvided("ana@correo.com".to_owned())
        );
        assert_eq!(
            signal("ana arroba correo", DialogueState::AwaitingContact, None),
            DialogueSignal::ContactInvalid
        );
    }

    #[test]
    fn email_with_cancel_word_is_still_contact() {
        assert_eq!(
            signal("reiniciar.ventas@tienda.com", DialogueState::AwaitingContact, None),
            DialogueSignal::ContactProvided("reiniciar.ventas@tienda.com".to_owned())
        );
        assert_eq!(
            signal("reiniciar", DialogueState::AwaitingContact, None),
            DialogueSignal::CancelRequested
        );
    }

    #[test]
    fn modify_requests_need_an_item_number() {
        assert_eq!(
            signal("eliminar item 2", DialogueState::AddingMore, None),
            DialogueSignal::RemoveRequested { position: 2 }
        );
        assert_eq!(
            signal("modificar item 1 a 3 unidades", DialogueState::AddingMore, None),
            DialogueSignal::QuantityChangeRequested { position: 1, quantity: 3 }
        );
        assert_eq!(
            signal("cambiar item 1 a cuatro", DialogueState::AddingMore, None),
            DialogueSignal::QuantityChangeRequested { position: 1, quantity: 4 }
        );
        assert_eq!(
            signal("quiero modificar algo", DialogueState::Start, None),
            DialogueSignal::ModifyUnspecified
        );
    }

    #[test]
    fn number_words_before_the_item_number_are_not_quantities() {
        assert_eq!(
            signal("quiero modificar un detalle del item 1", DialogueState::AddingMore, None),
            DialogueSignal::ModifyUnspecified
        );
        assert_eq!(
            signal("modificar una cosa del item 2 a tres", DialogueState::AddingMore, None),
            DialogueSignal::QuantityChangeRequested { position: 2, quantity: 3 }
        );
    }

    #[test]
    fn same_type_in_a_slot_state_supplies_fields() {
        let pending = PendingItem::new(FurnitureType::Silla, 1);
        assert_eq!(
            signal("la silla de metal", DialogueState::AwaitingMaterial, Some(&pending)),
            DialogueSignal::FieldsProvided(ItemAttributes {
                material: Some(Material::Metal),
                ..ItemAttributes::default()
            })
        );
        assert!(matches!(
            signal("mejor una mesa", DialogueState::AwaitingMaterial, Some(&pending)),
            DialogueSignal::NewItems(_)
        ));
        assert_eq!(
            signal("no sé", DialogueState::AwaitingMaterial, Some(&pending)),
            DialogueSignal::FieldUnrecognized
        );
    }

    #[test]
    fn cues_are_read_in_adding_more_and_finalizing() {
        assert_eq!(signal("sí", DialogueState::AddingMore, None), DialogueSignal::Affirmative);
        assert_eq!(signal("no", DialogueState::AddingMore, None), DialogueSignal::Negative);
        assert_eq!(signal("confirmo", DialogueState::Finalizing, None), DialogueSignal::Affirmative);
        assert_eq!(signal("nada más", DialogueState::Finalizing, None), DialogueSignal::Negative);
    }

    #[test]
    fn furniture_mention_in_finalizing_is_a_new_item() {
        match signal("quiero otra silla", DialogueState::Finalizing, None) {
            DialogueSignal::NewItems(drafts) => {
                assert_eq!(drafts.len(), 1);
                assert_eq!(drafts[0].furniture_type, FurnitureType::Silla);
            }
            other => panic!("expected a new item, got {other:?}"),
        }
    }

    #[test]
    fn fallback_maps_remaining_intents() {
        assert_eq!(signal("hola", DialogueState::Start, None), DialogueSignal::Greeting);
        assert_eq!(
            signal("me llamo Ana", DialogueState::Start, None),
            DialogueSignal::NameIntroduced("Ana".to_owned())
        );
        assert_eq!(
            signal("quiero un mueble", DialogueState::Start, None),
            DialogueSignal::OrderRequested
        );
        assert_eq!(signal("xyz", DialogueState::Start, None), DialogueSignal::Unrecognized);
    }

    #[test]
    fn drafts_split_attributes_between_mentions() {
        let entities =
            EntityExtractor::new().extract("quiero 2 sillas de metal negras y una mesa grande");
        let drafts = draft_items(&entities);

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].furniture_type, FurnitureType::Silla);
        assert_eq!(drafts[0].quantity, 2);
        assert_eq!(drafts[0].material, Some(Material::Metal));
        assert_eq!(drafts[0].color, Some(Color::Negro));
        assert_eq!(drafts[0].dimension, None);
        assert_eq!(drafts[1].furniture_type, FurnitureType::Mesa);
        assert_eq!(drafts[1].quantity, 1);
        assert_eq!(drafts[1].material, None);
        assert_eq!(drafts[1].dimension, Some(DimensionTier::Grande));
    }

    #[test]
    fn single_mention_quantity_falls_back_to_any_number() {
        let entities = EntityExtractor::new().extract("una silla, pero que sean 3");
        assert_eq!(draft_items(&entities)[0].quantity, 1);

        let entities = EntityExtractor::new().extract("sillas, necesito 3");
        assert_eq!(draft_items(&entities)[0].quantity, 3);
    }

    #[test]
    fn defaults_only_fill_missing_fields() {
        let draft = PendingItem::new(FurnitureType::Mesa, 1).with_attributes(ItemAttributes {
            color: Some(Color::Gris),
            ..ItemAttributes::default()
        });
        let filled = fill_defaults(
            draft,
            ItemAttributes {
                material: Some(Material::MaderaNoble),
                color: Some(Color::Natural),
                dimension: Some(DimensionTier::Estandar),
            },
        );
        assert_eq!(filled.material, Some(Material::MaderaNoble));
        assert_eq!(filled.color, Some(Color::Gris));
        assert_eq!(filled.dimension, Some(DimensionTier::Estandar));
    }
}
