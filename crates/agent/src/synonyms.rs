//! Lexeme tables that canonicalize raw Spanish words into catalog tags.
//!
//! Tables are ordered: when several keys of the same table occur in one
//! message, the key listed first wins, regardless of where it sits in the text.

use designbot_core::catalog::{Color, DimensionTier, FurnitureType, Material};
use designbot_core::domain::ItemAttributes;

pub const FURNITURE_SYNONYMS: &[(&str, FurnitureType)] = &[
    ("silla", FurnitureType::Silla),
    ("sillas", FurnitureType::Silla),
    ("mesa", FurnitureType::Mesa),
    ("mesas", FurnitureType::Mesa),
    ("sofá", FurnitureType::Sofa),
    ("sofa", FurnitureType::Sofa),
    ("sofás", FurnitureType::Sofa),
    ("sofas", FurnitureType::Sofa),
    ("estantería", FurnitureType::Estanteria),
    ("estanteria", FurnitureType::Estanteria),
    ("estanterías", FurnitureType::Estanteria),
    ("estanterias", FurnitureType::Estanteria),
    ("escritorio", FurnitureType::Escritorio),
    ("escritorios", FurnitureType::Escritorio),
];

pub const MATERIAL_SYNONYMS: &[(&str, Material)] = &[
    ("madera noble", Material::MaderaNoble),
    ("madera reciclada", Material::MaderaReciclada),
    ("roble", Material::MaderaNoble),
    ("nogal", Material::MaderaNoble),
    ("mdf", Material::MaderaMdf),
    ("metal", Material::Metal),
    ("acero", Material::Metal),
    ("vidrio", Material::Vidrio),
    ("cristal", Material::Vidrio),
    ("bambú", Material::Bambu),
    ("bambu", Material::Bambu),
    ("reciclada", Material::MaderaReciclada),
    ("madera", Material::MaderaNoble),
];

pub const COLOR_SYNONYMS: &[(&str, Color)] = &[
    ("madera oscura", Color::MaderaOscura),
    ("oscuro", Color::MaderaOscura),
    ("oscura", Color::MaderaOscura),
    ("caoba", Color::MaderaOscura),
    ("wengué", Color::MaderaOscura),
    ("wengue", Color::MaderaOscura),
    ("natural", Color::Natural),
    ("blanco", Color::Blanco),
    ("blanca", Color::Blanco),
    ("blancos", Color::Blanco),
    ("blancas", Color::Blanco),
    ("negro", Color::Negro),
    ("negra", Color::Negro),
    ("negros", Color::Negro),
    ("negras", Color::Negro),
    ("gris", Color::Gris),
    ("grises", Color::Gris),
];

pub const DIMENSION_SYNONYMS: &[(&str, DimensionTier)] = &[
    ("pequeño", DimensionTier::Pequeno),
    ("pequeña", DimensionTier::Pequeno),
    ("pequeno", DimensionTier::Pequeno),
    ("pequena", DimensionTier::Pequeno),
    ("chico", DimensionTier::Pequeno),
    ("chica", DimensionTier::Pequeno),
    ("estándar", DimensionTier::Estandar),
    ("estandar", DimensionTier::Estandar),
    ("normal", DimensionTier::Estandar),
    ("mediano", DimensionTier::Estandar),
    ("mediana", DimensionTier::Estandar),
    ("grande", DimensionTier::Grande),
    ("grandes", DimensionTier::Grande),
];

/// Single letters only count when they are the whole message.
pub const DIMENSION_ABBREVIATIONS: &[(&str, DimensionTier)] = &[
    ("s", DimensionTier::Pequeno),
    ("m", DimensionTier::Estandar),
    ("l", DimensionTier::Grande),
];

pub const NUMBER_WORDS: &[(&str, u32)] = &[
    ("un", 1),
    ("una", 1),
    ("uno", 1),
    ("dos", 2),
    ("tres", 3),
    ("cuatro", 4),
    ("cinco", 5),
    ("seis", 6),
    ("siete", 7),
    ("ocho", 8),
    ("nueve", 9),
    ("diez", 10),
];

/// The color phrase that would otherwise resolve as the material "madera".
const MATERIAL_MASKED_PHRASES: &[&str] = &["madera oscura"];

const AFFIRMATIVE_CUES: &[&str] = &[
    "sí", "si", "otro", "otra", "más", "mas", "claro", "agregar", "confirmar", "confirmo", "vale",
    "ok", "dale",
];

const NEGATIVE_CUES: &[&str] = &["no", "listo", "terminar", "finalizar", "nada"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Affirmative,
    Negative,
}

/// Lowercased, trimmed copy used by every lexical lookup.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn is_word_char(character: char) -> bool {
    character.is_alphanumeric()
}

/// Byte offset of the first occurrence of `phrase` bounded by non-word
/// characters (or the ends of `haystack`).
pub fn find_word(haystack: &str, phrase: &str) -> Option<usize> {
    if phrase.is_empty() {
        return None;
    }

    let mut from = 0;
    while let Some(relative) = haystack[from..].find(phrase) {
        let start = from + relative;
        let end = start + phrase.len();
        let before_ok = haystack[..start].chars().next_back().map_or(true, |c| !is_word_char(c));
        let after_ok = haystack[end..].chars().next().map_or(true, |c| !is_word_char(c));
        if before_ok && after_ok {
            return Some(start);
        }
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

pub fn contains_word(haystack: &str, phrase: &str) -> bool {
    find_word(haystack, phrase).is_some()
}

/// First key of `table` (in table order) present as a whole word.
pub fn first_in_table<T: Copy>(
    text: &str,
    table: &[(&'static str, T)],
) -> Option<(T, &'static str)> {
    table.iter().find(|(key, _)| contains_word(text, key)).map(|(key, value)| (*value, *key))
}

pub fn lookup<T: Copy>(lexeme: &str, table: &[(&'static str, T)]) -> Option<T> {
    let lexeme = normalize(lexeme);
    table.iter().find(|(key, _)| *key == lexeme).map(|(_, value)| *value)
}

fn mask_phrases(text: &str, phrases: &[&str]) -> String {
    let mut masked = text.to_owned();
    for phrase in phrases {
        while let Some(start) = find_word(&masked, phrase) {
            masked.replace_range(start..start + phrase.len(), &" ".repeat(phrase.len()));
        }
    }
    masked
}

pub fn canonical_furniture(text: &str) -> Option<(FurnitureType, &'static str)> {
    first_in_table(&normalize(text), FURNITURE_SYNONYMS)
}

/// Blanks out phrases such as "madera oscura" before material matching.
pub fn mask_material_phrases(text: &str) -> String {
    mask_phrases(text, MATERIAL_MASKED_PHRASES)
}

pub fn canonical_material(text: &str) -> Option<(Material, &'static str)> {
    first_in_table(&mask_material_phrases(&normalize(text)), MATERIAL_SYNONYMS)
}

pub fn canonical_color(text: &str) -> Option<(Color, &'static str)> {
    first_in_table(&normalize(text), COLOR_SYNONYMS)
}

pub fn canonical_dimension(text: &str) -> Option<(DimensionTier, &'static str)> {
    let normalized = normalize(text);
    first_in_table(&normalized, DIMENSION_SYNONYMS).or_else(|| {
        DIMENSION_ABBREVIATIONS
            .iter()
            .find(|(key, _)| *key == normalized)
            .map(|(key, value)| (*value, *key))
    })
}

/// Every attribute recognised in `text`, each resolved independently.
pub fn canonical_attributes(text: &str) -> ItemAttributes {
    ItemAttributes {
        material: canonical_material(text).map(|(material, _)| material),
        color: canonical_color(text).map(|(color, _)| color),
        dimension: canonical_dimension(text).map(|(dimension, _)| dimension),
    }
}

pub fn number_word(token: &str) -> Option<u32> {
    lookup(token, NUMBER_WORDS)
}

/// A quantity written either as digits or as a number word.
pub fn parse_quantity_token(token: &str) -> Option<u32> {
    let token = token.trim_matches(|c: char| !c.is_alphanumeric());
    token.parse::<u32>().ok().or_else(|| number_word(token))
}

/// Earliest number word in `text`.
pub fn first_number_word(text: &str) -> Option<u32> {
    normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .find_map(number_word)
}

/// The first yes/no token of the message, in reading order.
pub fn cue(text: &str) -> Option<Cue> {
    normalize(text).split(|c: char| !c.is_alphanumeric()).find_map(|token| {
        if AFFIRMATIVE_CUES.contains(&token) {
            Some(Cue::Affirmative)
        } else if NEGATIVE_CUES.contains(&token) {
            Some(Cue::Negative)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use designbot_core::catalog::{Color, DimensionTier, FurnitureType, Material};

    use super::{
        canonical_attributes, canonical_color, canonical_dimension, canonical_furniture,
        canonical_material, contains_word, cue, first_number_word, parse_quantity_token, Cue,
    };

    #[test]
    fn whole_word_matching_ignores_embedded_fragments() {
        assert!(contains_word("quiero metal", "metal"));
        assert!(!contains_word("metalizado", "metal"));
        assert!(!contains_word("nogales", "nogal"));
        assert!(contains_word("bambú, por favor", "bambú"));
    }

    #[test]
    fn first_table_key_wins_when_synonyms_co_occur() {
        assert_eq!(canonical_material("roble o metal").map(|m| m.0), Some(Material::MaderaNoble));
        assert_eq!(canonical_material("metal o roble").map(|m| m.0), Some(Material::MaderaNoble));
        assert_eq!(canonical_color("gris o negro").map(|c| c.0), Some(Color::Negro));
    }

    #[test]
    fn dark_wood_is_a_color_not_a_material() {
        assert_eq!(canonical_material("madera oscura"), None);
        assert_eq!(canonical_color("madera oscura").map(|c| c.0), Some(Color::MaderaOscura));
        assert_eq!(
            canonical_material("madera con acabado madera oscura").map(|m| m.0),
            Some(Material::MaderaNoble)
        );
        assert_eq!(canonical_material("madera").map(|m| m.0), Some(Material::MaderaNoble));
    }

    #[test]
    fn dimension_abbreviations_need_the_whole_message() {
        assert_eq!(canonical_dimension("L").map(|d| d.0), Some(DimensionTier::Grande));
        assert_eq!(canonical_dimension(" m ").map(|d| d.0), Some(DimensionTier::Estandar));
        assert_eq!(canonical_dimension("talla s por favor"), None);
        assert_eq!(canonical_dimension("mediana").map(|d| d.0), Some(DimensionTier::Estandar));
    }

    #[test]
    fn plural_and_accentless_furniture_forms_resolve() {
        assert_eq!(canonical_furniture("dos SOFAS").map(|f| f.0), Some(FurnitureType::Sofa));
        assert_eq!(
            canonical_furniture("una estanteria").map(|f| f.0),
            Some(FurnitureType::Estanteria)
        );
    }

    #[test]
    fn attributes_resolve_independently() {
        let attributes = canonical_attributes("de metal, negra y grande");
        assert_eq!(attributes.material, Some(Material::Metal));
        assert_eq!(attributes.color, Some(Color::Negro));
        assert_eq!(attributes.dimension, Some(DimensionTier::Grande));
    }

    #[test]
    fn quantity_tokens_accept_digits_and_words() {
        assert_eq!(parse_quantity_token("3"), Some(3));
        assert_eq!(parse_quantity_token("Dos"), Some(2));
        assert_eq!(parse_quantity_token("sillas"), None);
        assert_eq!(first_number_word("quiero cuatro mesas"), Some(4));
    }

    #[test]
    fn cues_follow_reading_order() {
        assert_eq!(cue("sí, otro más"), Some(Cue::Affirmative));
        assert_eq!(cue("no, listo"), Some(Cue::Negative));
        assert_eq!(cue("no gracias"), Some(Cue::Negative));
        assert_eq!(cue("silla"), None);
    }
}
