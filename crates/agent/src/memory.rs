use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::Intent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PreferenceKey {
    #[serde(rename = "material_favorito")]
    Material,
    #[serde(rename = "color_favorito")]
    Color,
    #[serde(rename = "tipo_favorito")]
    FurnitureType,
    #[serde(rename = "dimension_favorita")]
    Dimension,
}

impl PreferenceKey {
    pub const ALL: [Self; 4] = [Self::Material, Self::Color, Self::FurnitureType, Self::Dimension];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Material => "material_favorito",
            Self::Color => "color_favorito",
            Self::FurnitureType => "tipo_favorito",
            Self::Dimension => "dimension_favorita",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEvent {
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

/// Per-session recollection of who the user is and what they like. Only ever
/// used to decorate outgoing text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMemory {
    user_name: Option<String>,
    preferences: BTreeMap<PreferenceKey, Option<String>>,
    event_log: Vec<MemoryEvent>,
    last_intent: Option<Intent>,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self {
            user_name: None,
            preferences: PreferenceKey::ALL.into_iter().map(|key| (key, None)).collect(),
            event_log: Vec::new(),
            last_intent: None,
        }
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn preference(&self, key: PreferenceKey) -> Option<&str> {
        self.preferences.get(&key).and_then(Option::as_deref)
    }

    pub fn event_log(&self) -> &[MemoryEvent] {
        &self.event_log
    }

    pub fn last_intent(&self) -> Option<Intent> {
        self.last_intent
    }

    pub fn set_last_intent(&mut self, intent: Intent) {
        self.last_intent = Some(intent);
    }

    pub fn remember_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.log(format!("Usuario proporcionó nombre: {name}"));
        self.user_name = Some(name);
    }

    pub fn remember_preference(&mut self, key: PreferenceKey, value: impl Into<String>) {
        let value = value.into();
        self.log(format!("Preferencia guardada: {key} = {value}"));
        self.preferences.insert(key, Some(value));
    }

    pub fn reset(&mut self) {
        *self = Self::new();
        self.log("Memoria reiniciada".to_owned());
    }

    /// Injects the user's name into greetings and appends at most one reminder
    /// line per remembered preference kind.
    pub fn personalize(&self, message: &str) -> String {
        let mut personalized = message.to_owned();

        if let Some(name) = self.user_name() {
            if personalized.contains("¡Hola!") {
                personalized = personalized.replace("¡Hola!", &format!("¡Hola {name}!"));
            } else if personalized.contains("Hola") && !personalized.contains(name) {
                personalized = format!("¡Hola {name}! {personalized}");
            }
        }

        let lowered = personalized.to_lowercase();
        if let Some(material) = self.preference(PreferenceKey::Material) {
            if lowered.contains("material") {
                personalized.push_str(&format!("\n\n💡 Por cierto, sé que te gusta el {material}"));
            }
        }
        if let Some(color) = self.preference(PreferenceKey::Color) {
            if lowered.contains("color") {
                personalized.push_str(&format!("\n🎨 Recuerdo que prefieres el color {color}"));
            }
        }

        personalized
    }

    fn log(&mut self, description: String) {
        self.event_log.push(MemoryEvent { timestamp: Utc::now(), description });
    }
}

#[cfg(test)]
mod tests {
    use super::{ConversationMemory, PreferenceKey};

    #[test]
    fn greeting_marker_is_replaced_with_the_name() {
        let mut memory = ConversationMemory::new();
        memory.remember_name("Ana");

        assert_eq!(memory.personalize("¡Hola! ¿Qué tal?"), "¡Hola Ana! ¿Qué tal?");
        assert_eq!(memory.personalize("Hola de nuevo"), "¡Hola Ana! Hola de nuevo");
        assert_eq!(memory.personalize("Hola Ana"), "Hola Ana");
        assert_eq!(memory.personalize("Sin saludo"), "Sin saludo");
    }

    #[test]
    fn preference_reminders_are_single_lines_per_call() {
        let mut memory = ConversationMemory::new();
        memory.remember_preference(PreferenceKey::Material, "roble");
        memory.remember_preference(PreferenceKey::Color, "negro");

        let once = memory.personalize("¿Qué material y color prefieres?");
        assert_eq!(
            once,
            "¿Qué material y color prefieres?\n\n💡 Por cierto, sé que te gusta el roble\n🎨 Recuerdo que prefieres el color negro"
        );
        assert_eq!(once.matches("Por cierto").count(), 1);

        assert_eq!(memory.personalize("Listo"), "Listo");
    }

    #[test]
    fn personalize_is_pure() {
        let mut memory = ConversationMemory::new();
        memory.remember_preference(PreferenceKey::Material, "metal");
        let first = memory.personalize("Material elegido");
        let second = memory.personalize("Material elegido");
        assert_eq!(first, second);
    }

    #[test]
    fn reset_clears_name_and_preferences_but_logs_the_reset() {
        let mut memory = ConversationMemory::new();
        memory.remember_name("Luis");
        memory.remember_preference(PreferenceKey::Dimension, "grande");

        memory.reset();

        assert_eq!(memory.user_name(), None);
        assert_eq!(memory.preference(PreferenceKey::Dimension), None);
        assert_eq!(memory.event_log().len(), 1);
    }
}
