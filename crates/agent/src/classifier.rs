//! Lexical intent classification.
//!
//! Trigger phrases are matched as substrings of the lowercased message, so a
//! bare "sí" or "no" doubles as StartOrder / FinishOrder. The dialogue state
//! decides what those mean.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greet,
    StartOrder,
    ViewOrder,
    ModifyOrder,
    FinishOrder,
    AskPrice,
    Farewell,
    Unknown,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greet => "greet",
            Self::StartOrder => "start_order",
            Self::ViewOrder => "view_order",
            Self::ModifyOrder => "modify_order",
            Self::FinishOrder => "finish_order",
            Self::AskPrice => "ask_price",
            Self::Farewell => "farewell",
            Self::Unknown => "unknown",
        }
    }
}

/// Intents in priority order. Long, specific triggers come before the short
/// ambiguous ones.
const TRIGGERS: &[(Intent, &[&str])] = &[
    (
        Intent::ViewOrder,
        &["ver pedido", "qué tengo", "resumen", "carrito", "mostrar pedido", "qué pedí"],
    ),
    (
        Intent::ModifyOrder,
        &["eliminar", "quitar", "modificar", "cambiar", "editar pedido", "borrar item"],
    ),
    (
        Intent::AskPrice,
        &["cuánto cuesta", "precio", "coste", "valor", "qué precio", "cuál es el precio"],
    ),
    (Intent::Farewell, &["adiós", "chao", "hasta luego", "nos vemos", "gracias", "bye"]),
    (
        Intent::Greet,
        &[
            "hola",
            "buenos días",
            "buenas tardes",
            "hi",
            "hello",
            "qué tal",
            "cómo estás",
            "saludos",
        ],
    ),
    (
        Intent::StartOrder,
        &[
            "quiero un mueble",
            "diseñar mueble",
            "hacer pedido",
            "comenzar pedido",
            "nuevo mueble",
            "personalizar",
            "sí",
            "si",
        ],
    ),
    (
        Intent::FinishOrder,
        &["terminar", "finalizar", "completar", "listo", "eso es todo", "acabar pedido", "no"],
    ),
];

/// Fallback keywords must be longer than this many characters.
const MIN_KEYWORD_CHARS: usize = 3;

#[derive(Clone, Debug)]
pub struct IntentClassifier {
    triggers: Vec<(Intent, Vec<&'static str>)>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            triggers: TRIGGERS
                .iter()
                .map(|(intent, phrases)| (*intent, phrases.to_vec()))
                .collect(),
        }
    }

    pub fn classify(&self, text: &str) -> Intent {
        if text.trim().is_empty() {
            return Intent::Unknown;
        }
        let lowered = text.to_lowercase();

        for (intent, phrases) in &self.triggers {
            if phrases.iter().any(|phrase| lowered.contains(phrase)) {
                return *intent;
            }
        }

        self.keyword_fallback(&lowered)
    }

    /// Scores each intent by how many of its trigger words (repeats included)
    /// occur in the text; the first highest positive score wins.
    fn keyword_fallback(&self, lowered: &str) -> Intent {
        let mut best = (Intent::Unknown, 0usize);
        for (intent, phrases) in &self.triggers {
            let score = phrases
                .iter()
                .flat_map(|phrase| phrase.split_whitespace())
                .filter(|word| word.chars().count() > MIN_KEYWORD_CHARS && lowered.contains(word))
                .count();
            if score > best.1 {
                best = (*intent, score);
            }
        }
        best.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Intent, IntentClassifier};

    #[test]
    fn classifies_canonical_triggers() {
        struct Case {
            text: &'static str,
            expected: Intent,
        }

        let cases = [
            Case { text: "Hola", expected: Intent::Greet },
            Case { text: "buenos días!", expected: Intent::Greet },
            Case { text: "sí", expected: Intent::StartOrder },
            Case { text: "quiero un mueble", expected: Intent::StartOrder },
            Case { text: "ver pedido", expected: Intent::ViewOrder },
            Case { text: "eliminar item 1", expected: Intent::ModifyOrder },
            Case { text: "no", expected: Intent::FinishOrder },
            Case { text: "eso es todo", expected: Intent::FinishOrder },
            Case { text: "¿Cuánto cuesta una mesa?", expected: Intent::AskPrice },
            Case { text: "adiós", expected: Intent::Farewell },
        ];

        let classifier = IntentClassifier::new();
        for (index, case) in cases.iter().enumerate() {
            assert_eq!(classifier.classify(case.text), case.expected, "case {index}: {}", case.text);
        }
    }

    #[test]
    fn specific_intents_outrank_short_ambiguous_triggers() {
        let classifier = IntentClassifier::new();
        // "no" is inside "nos vemos" and "hola" shares the message.
        assert_eq!(classifier.classify("hola, nos vemos"), Intent::Farewell);
        assert_eq!(classifier.classify("no, quiero ver pedido"), Intent::ViewOrder);
    }

    #[test]
    fn keyword_fallback_counts_long_words() {
        let classifier = IntentClassifier::new();
        // "pedido" scores 2 for both ViewOrder and StartOrder; the earlier intent wins.
        assert_eq!(classifier.classify("pedido"), Intent::ViewOrder);
        assert_eq!(classifier.classify("mueble"), Intent::StartOrder);
    }

    #[test]
    fn empty_or_unmatched_input_is_unknown() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.classify("   "), Intent::Unknown);
        assert_eq!(classifier.classify("xyz"), Intent::Unknown);
    }
}
