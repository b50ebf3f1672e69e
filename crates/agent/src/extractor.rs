//! Regex-based entity extraction.
//!
//! Each entity kind has one pattern and is extracted independently: a failure
//! for one kind is logged and leaves the others untouched. Furniture, material,
//! color and dimension values are returned as the raw lexeme found in the text;
//! mapping them onto catalog tags is the dialogue's job.

use std::collections::BTreeMap;
use std::fmt;

use designbot_core::catalog::FurnitureType;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::synonyms::{
    self, COLOR_SYNONYMS, DIMENSION_ABBREVIATIONS, DIMENSION_SYNONYMS, FURNITURE_SYNONYMS,
    MATERIAL_SYNONYMS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Name,
    FurnitureType,
    Quantity,
    Material,
    Color,
    DimensionTier,
}

impl EntityKind {
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::FurnitureType,
        Self::Quantity,
        Self::Material,
        Self::Color,
        Self::DimensionTier,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::FurnitureType => "furniture_type",
            Self::Quantity => "quantity",
            Self::Material => "material",
            Self::Color => "color",
            Self::DimensionTier => "dimension",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityValue {
    Text(String),
    Number(u32),
}

#[derive(Clone, Debug, Error)]
pub enum ExtractionError {
    #[error("no {0} found")]
    NoMatch(EntityKind),
    #[error("could not read {kind} from `{raw}`: {reason}")]
    Parse { kind: EntityKind, raw: String, reason: String },
    #[error("{kind} pattern failed to compile: {source}")]
    Pattern { kind: EntityKind, source: regex::Error },
}

/// One furniture word in the message, with its byte span in
/// [`ExtractedEntities::normalized`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FurnitureMention {
    pub furniture_type: FurnitureType,
    pub lexeme: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedEntities {
    /// Lowercased, trimmed message every span refers to.
    pub normalized: String,
    values: BTreeMap<EntityKind, EntityValue>,
    pub mentions: Vec<FurnitureMention>,
    pub integers: Vec<u32>,
}

impl ExtractedEntities {
    pub fn get(&self, kind: EntityKind) -> Option<&EntityValue> {
        self.values.get(&kind)
    }

    pub fn has(&self, kind: EntityKind) -> bool {
        self.values.contains_key(&kind)
    }

    pub fn text(&self, kind: EntityKind) -> Option<&str> {
        match self.values.get(&kind) {
            Some(EntityValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.text(EntityKind::Name)
    }

    pub fn quantity(&self) -> Option<u32> {
        match self.values.get(&EntityKind::Quantity) {
            Some(EntityValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.values.keys().copied()
    }
}

/// Words that end a captured name ("soy Ana y quiero...").
const NAME_STOPWORDS: &[&str] =
    &["y", "e", "quiero", "quisiera", "busco", "necesito", "me", "tengo", "pero", "para"];
const MAX_NAME_WORDS: usize = 3;

#[derive(Debug)]
pub struct EntityExtractor {
    patterns: BTreeMap<EntityKind, Result<Regex, regex::Error>>,
    integers: Result<Regex, regex::Error>,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor {
    pub fn new() -> Self {
        let dimension_words = alternation(DIMENSION_SYNONYMS.iter().map(|(key, _)| *key));
        let dimension_letters = alternation(DIMENSION_ABBREVIATIONS.iter().map(|(key, _)| *key));

        let patterns = [
            (
                EntityKind::Name,
                Regex::new(r"\b(?:me llamo|mi nombre es|soy)\s+(\p{L}+(?:\s+\p{L}+)*)"),
            ),
            (EntityKind::FurnitureType, word_pattern(FURNITURE_SYNONYMS.iter().map(|(k, _)| *k))),
            (EntityKind::Quantity, Regex::new(r"\d+")),
            (EntityKind::Material, word_pattern(MATERIAL_SYNONYMS.iter().map(|(k, _)| *k))),
            (EntityKind::Color, word_pattern(COLOR_SYNONYMS.iter().map(|(k, _)| *k))),
            (
                EntityKind::DimensionTier,
                Regex::new(&format!(r"\b(?:{dimension_words})\b|^(?:{dimension_letters})$")),
            ),
        ]
        .into_iter()
        .collect();

        Self { patterns, integers: Regex::new(r"\d+") }
    }

    pub fn extract(&self, text: &str) -> ExtractedEntities {
        let normalized = synonyms::normalize(text);
        let mut entities = ExtractedEntities {
            mentions: self.furniture_mentions(&normalized),
            integers: self.integers(&normalized),
            ..ExtractedEntities::default()
        };

        for kind in EntityKind::ALL {
            match self.extract_kind(kind, &normalized) {
                Ok(value) => {
                    entities.values.insert(kind, value);
                }
                Err(ExtractionError::NoMatch(_)) => {}
                Err(error) => {
                    debug!(
                        event_name = "extraction.failed",
                        kind = kind.as_str(),
                        error = %error,
                        "entity extraction failed"
                    );
                }
            }
        }

        entities.normalized = normalized;
        entities
    }

    /// Extracts one kind from an already normalized message.
    pub fn extract_kind(
        &self,
        kind: EntityKind,
        normalized: &str,
    ) -> Result<EntityValue, ExtractionError> {
        let pattern = self.pattern(kind)?;
        match kind {
            EntityKind::Name => {
                let captured = pattern
                    .captures(normalized)
                    .and_then(|captures| captures.get(1))
                    .ok_or(ExtractionError::NoMatch(kind))?;
                clean_name(captured.as_str()).map(EntityValue::Text).ok_or_else(|| {
                    ExtractionError::Parse {
                        kind,
                        raw: captured.as_str().to_owned(),
                        reason: "no name before stopword".to_owned(),
                    }
                })
            }
            EntityKind::Quantity => {
                let found = pattern.find(normalized).ok_or(ExtractionError::NoMatch(kind))?;
                found.as_str().parse::<u32>().map(EntityValue::Number).map_err(|error| {
                    ExtractionError::Parse {
                        kind,
                        raw: found.as_str().to_owned(),
                        reason: error.to_string(),
                    }
                })
            }
            EntityKind::Material => {
                let masked = synonyms::mask_material_phrases(normalized);
                pattern
                    .find(&masked)
                    .map(|found| EntityValue::Text(found.as_str().to_owned()))
                    .ok_or(ExtractionError::NoMatch(kind))
            }
            EntityKind::FurnitureType | EntityKind::Color | EntityKind::DimensionTier => pattern
                .find(normalized)
                .map(|found| EntityValue::Text(found.as_str().to_owned()))
                .ok_or(ExtractionError::NoMatch(kind)),
        }
    }

    /// Every furniture word in reading order.
    pub fn furniture_mentions(&self, normalized: &str) -> Vec<FurnitureMention> {
        let Ok(pattern) = self.pattern(EntityKind::FurnitureType) else {
            return Vec::new();
        };
        pattern
            .find_iter(normalized)
            .filter_map(|found| {
                let furniture_type = synonyms::lookup(found.as_str(), FURNITURE_SYNONYMS)?;
                Some(FurnitureMention {
                    furniture_type,
                    lexeme: found.as_str().to_owned(),
                    start: found.start(),
                    end: found.end(),
                })
            })
            .collect()
    }

    /// Every embedded integer that fits a `u32`, in reading order.
    pub fn integers(&self, normalized: &str) -> Vec<u32> {
        match &self.integers {
            Ok(pattern) => pattern
                .find_iter(normalized)
                .filter_map(|found| found.as_str().parse::<u32>().ok())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn pattern(&self, kind: EntityKind) -> Result<&Regex, ExtractionError> {
        match self.patterns.get(&kind) {
            Some(Ok(pattern)) => Ok(pattern),
            Some(Err(source)) => Err(ExtractionError::Pattern { kind, source: source.clone() }),
            None => Err(ExtractionError::NoMatch(kind)),
        }
    }
}

/// Longest alternatives first so "madera noble" wins over "madera" at the
/// same position.
fn alternation<'a>(words: impl Iterator<Item = &'a str>) -> String {
    let mut words = words.collect::<Vec<_>>();
    words.sort_by_key(|word| std::cmp::Reverse(word.len()));
    words.into_iter().map(regex::escape).collect::<Vec<_>>().join("|")
}

fn word_pattern<'a>(words: impl Iterator<Item = &'a str>) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\b(?:{})\b", alternation(words)))
}

fn clean_name(raw: &str) -> Option<String> {
    let words = raw
        .split_whitespace()
        .take_while(|word| !NAME_STOPWORDS.contains(word))
        .take(MAX_NAME_WORDS)
        .map(title_case)
        .collect::<Vec<_>>();
    (!words.is_empty()).then(|| words.join(" "))
}

fn title_case(word: &str) -> String {
    let mut characters = word.chars();
    match characters.next() {
        Some(first) => first.to_uppercase().chain(characters).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use designbot_core::catalog::FurnitureType;

    use super::{EntityExtractor, EntityKind, EntityValue, ExtractionError};

    #[test]
    fn extracts_each_kind_independently() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("Me llamo ana lucía y quiero 3 sillas de roble negras, grandes");

        assert_eq!(entities.name(), Some("Ana Lucía"));
        assert_eq!(entities.quantity(), Some(3));
        assert_eq!(entities.text(EntityKind::FurnitureType), Some("sillas"));
        assert_eq!(entities.text(EntityKind::Material), Some("roble"));
        assert_eq!(entities.text(EntityKind::Color), Some("negras"));
        assert_eq!(entities.text(EntityKind::DimensionTier), Some("grandes"));
    }

    #[test]
    fn first_match_in_text_wins_for_raw_lexemes() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("metal o roble");
        assert_eq!(entities.text(EntityKind::Material), Some("metal"));
    }

    #[test]
    fn dark_wood_phrase_is_not_a_material() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("madera oscura");
        assert!(!entities.has(EntityKind::Material));
        assert_eq!(entities.text(EntityKind::Color), Some("madera oscura"));
    }

    #[test]
    fn name_capture_stops_at_stopwords_and_word_limit() {
        let extractor = EntityExtractor::new();
        assert_eq!(extractor.extract("soy pedro y quiero una mesa").name(), Some("Pedro"));
        assert_eq!(
            extractor.extract("mi nombre es maría josé garcía lópez").name(),
            Some("María José García")
        );
    }

    #[test]
    fn name_without_words_reports_parse_error() {
        let extractor = EntityExtractor::new();
        let error = extractor
            .extract_kind(EntityKind::Name, "soy y punto")
            .expect_err("stopword right after trigger");
        assert!(matches!(error, ExtractionError::Parse { kind: EntityKind::Name, .. }));
    }

    #[test]
    fn oversized_quantity_is_a_parse_error_not_a_panic() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("quiero 99999999999 sillas negras");

        assert_eq!(entities.quantity(), None);
        assert_eq!(entities.text(EntityKind::Color), Some("negras"));
        assert!(matches!(
            extractor.extract_kind(EntityKind::Quantity, "99999999999"),
            Err(ExtractionError::Parse { .. })
        ));
    }

    #[test]
    fn mentions_carry_spans_in_reading_order() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("Quiero 2 SILLAS y 1 mesa");

        let kinds = entities.mentions.iter().map(|m| m.furniture_type).collect::<Vec<_>>();
        assert_eq!(kinds, vec![FurnitureType::Silla, FurnitureType::Mesa]);
        let first = &entities.mentions[0];
        assert_eq!(&entities.normalized[first.start..first.end], "sillas");
        assert_eq!(entities.integers, vec![2, 1]);
    }

    #[test]
    fn dimension_letters_only_match_whole_message() {
        let extractor = EntityExtractor::new();
        assert_eq!(
            extractor.extract("L").get(EntityKind::DimensionTier),
            Some(&EntityValue::Text("l".to_owned()))
        );
        assert!(!extractor.extract("la mesa").has(EntityKind::DimensionTier));
    }

    #[test]
    fn nothing_found_yields_empty_entities() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("buenas tardes");
        assert!(entities.is_empty());
        assert!(entities.mentions.is_empty());
    }
}
