use std::sync::Arc;

use designbot_core::audit::{AuditContext, AuditSink, TracingAuditSink};
use designbot_core::catalog::{Catalog, CatalogTag};
use designbot_core::config::{AppConfig, DialogueConfig};
use designbot_core::domain::{FieldValue, ItemAttributes, PendingItem, SessionId};
use designbot_core::errors::ApplicationError;
use designbot_core::flows::{
    DialogueAction, DialogueContext, DialogueSignal, DialogueState, FlowEngine, GuidedOrderFlow,
    TransitionOutcome,
};
use designbot_core::orders::{OrderExport, OrderManager};
use tracing::{debug, info, warn};

use crate::classifier::{Intent, IntentClassifier};
use crate::controller;
use crate::extractor::EntityExtractor;
use crate::memory::{ConversationMemory, PreferenceKey};
use crate::responses;
use crate::synonyms;

const AUDIT_ACTOR: &str = "designbot";

/// One user's conversation: owns the order, the memory and every piece of
/// state a turn may touch. Sessions share nothing but the read-only catalog.
pub struct DialogueSession {
    session_id: SessionId,
    orders: OrderManager,
    memory: ConversationMemory,
    classifier: IntentClassifier,
    extractor: EntityExtractor,
    engine: FlowEngine<GuidedOrderFlow>,
    config: DialogueConfig,
    audit_sink: Arc<dyn AuditSink>,
    completed_orders: Vec<OrderExport>,
    turn: u64,
}

impl DialogueSession {
    pub fn new(catalog: Arc<Catalog>, config: DialogueConfig) -> Self {
        Self::with_audit_sink(catalog, config, Arc::new(TracingAuditSink))
    }

    pub fn with_audit_sink(
        catalog: Arc<Catalog>,
        config: DialogueConfig,
        audit_sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            session_id: SessionId::generate(),
            orders: OrderManager::new(catalog),
            memory: ConversationMemory::new(),
            classifier: IntentClassifier::new(),
            extractor: EntityExtractor::new(),
            engine: FlowEngine::default(),
            config,
            audit_sink,
            completed_orders: Vec::new(),
            turn: 0,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApplicationError> {
        let catalog = config.load_catalog()?;
        Ok(Self::new(Arc::new(catalog), config.dialogue))
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn state(&self) -> DialogueState {
        self.orders.state()
    }

    pub fn order(&self) -> &OrderManager {
        &self.orders
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn last_intent(&self) -> Option<Intent> {
        self.memory.last_intent()
    }

    /// Orders confirmed earlier in this session, oldest first.
    pub fn completed_orders(&self) -> &[OrderExport] {
        &self.completed_orders
    }

    /// The order in progress, or the last confirmed one when the cart is empty.
    pub fn export_order(&self) -> OrderExport {
        match self.completed_orders.last() {
            Some(last) if self.orders.items().is_empty() => last.clone(),
            _ => self.orders.export(),
        }
    }

    /// Drops the order and the memory; confirmed orders are kept.
    pub fn new_session(&mut self) {
        self.orders.reset();
        self.memory.reset();
        info!(
            event_name = "session.reset",
            session_id = %self.session_id,
            "dialogue session reset"
        );
    }

    /// Runs one full turn. Always answers: a rejected transition is logged
    /// and answered with the current state's prompt.
    pub fn process_message(&mut self, text: &str) -> String {
        self.turn += 1;
        let current = self.orders.state();
        let intent = self.classifier.classify(text);
        let entities = self.extractor.extract(text);

        if let Some(name) = entities.name() {
            self.memory.remember_name(name);
            self.orders.set_customer_name(name);
        }
        self.memory.set_last_intent(intent);

        let signal =
            controller::interpret(text, intent, &entities, current, self.orders.pending());
        let context = DialogueContext {
            has_items: !self.orders.items().is_empty(),
            pending: self.orders.pending().cloned(),
        };
        let audit = AuditContext::new(
            Some(self.session_id.clone()),
            format!("{}-{}", self.session_id, self.turn),
            AUDIT_ACTOR,
        );

        debug!(
            event_name = "dialogue.turn_started",
            session_id = %self.session_id,
            state = ?current,
            intent = intent.as_str(),
            signal = signal.name(),
            "processing message"
        );

        let reply = match self.engine.apply_with_audit(
            current,
            &signal,
            &context,
            self.audit_sink.as_ref(),
            &audit,
        ) {
            Ok(outcome) => {
                let reply = self.execute(&outcome, &entities.normalized);
                self.orders.set_state(outcome.to.settle());
                reply
            }
            Err(error) => {
                warn!(
                    event_name = "dialogue.transition_failed",
                    session_id = %self.session_id,
                    state = ?current,
                    intent = intent.as_str(),
                    error = %error,
                    "transition rejected, repeating state prompt"
                );
                responses::state_prompt(current, context.has_items)
            }
        };

        info!(
            event_name = "dialogue.turn_completed",
            session_id = %self.session_id,
            state = ?self.orders.state(),
            intent = intent.as_str(),
            items = self.orders.items().len(),
            "message processed"
        );

        self.memory.personalize(&reply)
    }

    fn execute(&mut self, outcome: &TransitionOutcome, normalized: &str) -> String {
        let mut parts = Vec::with_capacity(outcome.actions.len());
        for action in &outcome.actions {
            if let Some(part) = self.perform(*action, outcome, normalized) {
                parts.push(part);
            }
        }
        parts.join("\n\n")
    }

    fn perform(
        &mut self,
        action: DialogueAction,
        outcome: &TransitionOutcome,
        normalized: &str,
    ) -> Option<String> {
        let has_items = !self.orders.items().is_empty();
        match action {
            DialogueAction::Greet => Some(responses::GREETING.to_owned()),
            DialogueAction::AcknowledgeName => match &outcome.signal {
                DialogueSignal::NameIntroduced(name) => Some(responses::acknowledge_name(name)),
                _ => None,
            },
            DialogueAction::PromptForState => {
                Some(responses::state_prompt(outcome.to.settle(), has_items))
            }
            DialogueAction::AskForField(field) => {
                Some(responses::ask_for_field(field, has_items))
            }
            DialogueAction::RepromptField(field) => Some(responses::reprompt_field(field)),
            DialogueAction::StartPendingItem => {
                let DialogueSignal::NewItems(drafts) = &outcome.signal else {
                    return None;
                };
                let draft = drafts.first()?.clone();
                let mut values = vec![FieldValue::FurnitureType(draft.furniture_type)];
                values.extend(draft.attributes().values());
                self.remember_values(&values, normalized);
                self.orders.start_pending(draft);
                Some(responses::acknowledge(&values))
            }
            DialogueAction::ApplyFields => {
                let DialogueSignal::FieldsProvided(attributes) = &outcome.signal else {
                    return None;
                };
                let values = attributes.values();
                for value in &values {
                    self.orders.set_field(*value);
                }
                self.remember_values(&values, normalized);
                Some(responses::acknowledge(&values))
            }
            DialogueAction::CommitPendingItem => match self.orders.try_commit_pending() {
                Ok(item) => {
                    let item = item.clone();
                    Some(responses::item_added(&item, &self.orders.summary()))
                }
                Err(error) => {
                    warn!(
                        event_name = "order.commit_rejected",
                        session_id = %self.session_id,
                        error = %error,
                        "pending item could not be committed"
                    );
                    None
                }
            },
            DialogueAction::CommitSingleShotItems => {
                let DialogueSignal::NewItems(drafts) = &outcome.signal else {
                    return None;
                };
                Some(self.commit_single_shot(drafts, normalized))
            }
            DialogueAction::OfferMoreItems => Some(responses::ADD_MORE_QUESTION.to_owned()),
            DialogueAction::PresentFinalSummary => {
                Some(responses::final_summary(&self.orders.summary()))
            }
            DialogueAction::ExplainEmptyOrder => Some(responses::EMPTY_ORDER.to_owned()),
            DialogueAction::OfferChanges => Some(responses::OFFER_CHANGES.to_owned()),
            DialogueAction::AskForContact => {
                Some(responses::ask_for_contact(self.memory.user_name()))
            }
            DialogueAction::RepromptContact => Some(responses::CONTACT_REPROMPT.to_owned()),
            DialogueAction::StoreContact => {
                if let DialogueSignal::ContactProvided(email) = &outcome.signal {
                    self.orders.set_contact_email(email);
                }
                None
            }
            DialogueAction::ConfirmOrder => {
                let export = self.orders.export();
                let email = export.email.clone().unwrap_or_default();
                let reply = responses::order_confirmed(
                    self.memory.user_name(),
                    &self.orders.summary(),
                    &email,
                );
                info!(
                    event_name = "order.confirmed",
                    session_id = %self.session_id,
                    items = export.items.len(),
                    total = %export.total,
                    "order confirmed"
                );
                self.completed_orders.push(export);
                Some(reply)
            }
            DialogueAction::ResetOrder => {
                self.orders.reset();
                if let Some(name) = self.memory.user_name() {
                    self.orders.set_customer_name(name);
                }
                None
            }
            DialogueAction::ConfirmCancellation => Some(responses::CANCELLED.to_owned()),
            DialogueAction::RemoveItem => {
                let DialogueSignal::RemoveRequested { position } = outcome.signal else {
                    return None;
                };
                let removed = position
                    .checked_sub(1)
                    .is_some_and(|index| self.orders.remove_item(index));
                let summary = self.orders.summary();
                Some(if removed {
                    responses::item_removed(position, &summary)
                } else {
                    responses::nothing_changed(position, &summary)
                })
            }
            DialogueAction::ChangeItemQuantity => {
                let DialogueSignal::QuantityChangeRequested { position, quantity } =
                    outcome.signal
                else {
                    return None;
                };
                let changed = position
                    .checked_sub(1)
                    .is_some_and(|index| self.orders.set_item_quantity(index, quantity));
                let summary = self.orders.summary();
                Some(if changed {
                    responses::quantity_changed(position, quantity, &summary)
                } else {
                    responses::nothing_changed(position, &summary)
                })
            }
            DialogueAction::ExplainModifyUsage => Some(responses::MODIFY_HELP.to_owned()),
            DialogueAction::RenderSummary => {
                Some(responses::view_order(&self.orders.summary(), has_items))
            }
            DialogueAction::QuotePrice => match &outcome.signal {
                DialogueSignal::PriceRequested(query) => {
                    Some(responses::price_answer(self.orders.catalog(), query))
                }
                _ => None,
            },
            DialogueAction::SayGoodbye => Some(responses::farewell(self.memory.user_name())),
        }
    }

    fn commit_single_shot(&mut self, drafts: &[PendingItem], normalized: &str) -> String {
        let defaults = ItemAttributes {
            material: Some(self.config.default_material),
            color: Some(self.config.default_color),
            dimension: Some(self.config.default_dimension),
        };

        let mut added = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let mut explicit = vec![FieldValue::FurnitureType(draft.furniture_type)];
            explicit.extend(draft.attributes().values());
            self.remember_values(&explicit, normalized);

            self.orders.start_pending(controller::fill_defaults(draft.clone(), defaults));
            match self.orders.try_commit_pending() {
                Ok(item) => added.push(item.clone()),
                Err(error) => warn!(
                    event_name = "order.commit_rejected",
                    session_id = %self.session_id,
                    error = %error,
                    "single-shot item could not be committed"
                ),
            }
        }

        let summary = self.orders.summary();
        match added.as_slice() {
            [item] => responses::item_added(item, &summary),
            items => responses::items_added(items.len(), &summary),
        }
    }

    /// Preferences keep the word the user typed when a synonym matched it,
    /// and the catalog label otherwise.
    fn remember_values(&mut self, values: &[FieldValue], normalized: &str) {
        for value in values {
            let (key, word) = match *value {
                FieldValue::FurnitureType(kind) => (
                    PreferenceKey::FurnitureType,
                    synonyms::canonical_furniture(normalized)
                        .filter(|(found, _)| *found == kind)
                        .map(|(_, key)| key.to_owned()),
                ),
                FieldValue::Material(material) => (
                    PreferenceKey::Material,
                    synonyms::canonical_material(normalized)
                        .filter(|(found, _)| *found == material)
                        .map(|(_, key)| key.to_owned()),
                ),
                FieldValue::Color(color) => (
                    PreferenceKey::Color,
                    synonyms::canonical_color(normalized)
                        .filter(|(found, _)| *found == color)
                        .map(|(_, key)| key.to_owned()),
                ),
                FieldValue::Dimension(_) => (PreferenceKey::Dimension, None),
            };
            let word = word.unwrap_or_else(|| value_label(value).to_lowercase());
            self.memory.remember_preference(key, word);
        }
    }
}

fn value_label(value: &FieldValue) -> &'static str {
    match *value {
        FieldValue::FurnitureType(kind) => kind.label(),
        FieldValue::Material(material) => material.label(),
        FieldValue::Color(color) => color.label(),
        FieldValue::Dimension(tier) => tier.label(),
    }
}
