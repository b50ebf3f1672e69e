//! Dialogue runtime for the furniture ordering assistant.
//!
//! Each user message goes through a fixed, single-pass pipeline:
//! 1. **Intent classification** (`classifier`): trigger phrases, then a keyword fallback
//! 2. **Entity extraction** (`extractor`): raw lexemes for name, type, quantity and attributes
//! 3. **Interpretation** (`controller`): intent + entities + state become a `DialogueSignal`
//! 4. **Transition** (`designbot_core::flows`): the table-driven flow picks actions and the next state
//! 5. **Execution** (`runtime`): actions mutate the order and build the Spanish reply,
//!    which `memory` personalizes
//!
//! Prices and cart contents are always decided by `designbot_core`; this crate
//! only reads text and renders answers.

pub mod classifier;
pub mod controller;
pub mod extractor;
pub mod memory;
pub mod responses;
pub mod runtime;
pub mod synonyms;

pub use classifier::{Intent, IntentClassifier};
pub use extractor::{EntityExtractor, EntityKind, EntityValue, ExtractedEntities, ExtractionError};
pub use memory::{ConversationMemory, PreferenceKey};
pub use runtime::DialogueSession;
