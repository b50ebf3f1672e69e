use thiserror::Error;

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::domain::order::{ItemField, PendingItem};
use crate::flows::states::{
    DialogueAction, DialogueContext, DialogueSignal, DialogueState, TransitionOutcome,
};

pub trait DialogueFlow {
    fn initial_state(&self) -> DialogueState;
    fn transition(
        &self,
        current: DialogueState,
        signal: &DialogueSignal,
        context: &DialogueContext,
    ) -> Result<TransitionOutcome, FlowTransitionError>;
}

/// The guided furniture configuration dialogue: type, material, color,
/// dimension, then more items, confirmation and contact.
#[derive(Clone, Debug, Default)]
pub struct GuidedOrderFlow;

impl DialogueFlow for GuidedOrderFlow {
    fn initial_state(&self) -> DialogueState {
        DialogueState::Start
    }

    fn transition(
        &self,
        current: DialogueState,
        signal: &DialogueSignal,
        context: &DialogueContext,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        transition_guided_order(current, signal, context)
    }
}

pub struct FlowEngine<F> {
    flow: F,
}

impl<F> FlowEngine<F>
where
    F: DialogueFlow,
{
    pub fn new(flow: F) -> Self {
        Self { flow }
    }

    pub fn initial_state(&self) -> DialogueState {
        self.flow.initial_state()
    }

    pub fn apply(
        &self,
        current: DialogueState,
        signal: &DialogueSignal,
        context: &DialogueContext,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        self.flow.transition(current, signal, context)
    }

    pub fn apply_with_audit<S>(
        &self,
        current: DialogueState,
        signal: &DialogueSignal,
        context: &DialogueContext,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<TransitionOutcome, FlowTransitionError>
    where
        S: AuditSink + ?Sized,
    {
        let result = self.apply(current, signal, context);
        match &result {
            Ok(outcome) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "dialogue.transition_applied",
                        AuditCategory::Dialogue,
                        AuditOutcome::Success,
                    )
                    .with_metadata("from", format!("{:?}", outcome.from))
                    .with_metadata("to", format!("{:?}", outcome.to))
                    .with_metadata("signal", outcome.signal.name()),
                );
            }
            Err(error) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "dialogue.transition_rejected",
                        AuditCategory::Dialogue,
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("error", error.to_string()),
                );
            }
        }
        result
    }
}

impl Default for FlowEngine<GuidedOrderFlow> {
    fn default() -> Self {
        Self::new(GuidedOrderFlow)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("invalid transition from {state:?} using signal `{signal}`")]
    InvalidTransition { state: DialogueState, signal: &'static str },
    #[error("signal `{signal}` in {state:?} needs an item under construction")]
    MissingPendingItem { state: DialogueState, signal: &'static str },
}

/// Several furniture mentions, or one mention carrying attributes, are built
/// in a single turn instead of being walked through the guided questions.
pub fn is_single_shot(drafts: &[PendingItem]) -> bool {
    drafts.len() > 1 || drafts.iter().any(PendingItem::has_attributes)
}

fn after_fields(next_missing: Option<ItemField>) -> (DialogueState, Vec<DialogueAction>) {
    use DialogueAction::{ApplyFields, AskForField, CommitPendingItem, OfferMoreItems};

    match next_missing {
        Some(field) => (DialogueState::awaiting(field), vec![ApplyFields, AskForField(field)]),
        None => (DialogueState::AddingMore, vec![ApplyFields, CommitPendingItem, OfferMoreItems]),
    }
}

fn transition_guided_order(
    current: DialogueState,
    signal: &DialogueSignal,
    context: &DialogueContext,
) -> Result<TransitionOutcome, FlowTransitionError> {
    use DialogueAction::{
        AcknowledgeName, AskForContact, AskForField, ChangeItemQuantity, CommitPendingItem,
        CommitSingleShotItems, ConfirmCancellation, ConfirmOrder, ExplainEmptyOrder,
        ExplainModifyUsage, Greet, OfferChanges, OfferMoreItems, PresentFinalSummary,
        PromptForState, QuotePrice, RemoveItem, RenderSummary, RepromptContact, RepromptField,
        ResetOrder, SayGoodbye, StartPendingItem, StoreContact,
    };
    use DialogueSignal::{
        Affirmative, CancelRequested, ContactInvalid, ContactProvided, Farewell,
        FieldUnrecognized, FieldsProvided, FinishRequested, Greeting, ModifyUnspecified,
        NameIntroduced, Negative, NewItems, OrderRequested, PriceRequested,
        QuantityChangeRequested, RemoveRequested, Unrecognized, ViewRequested,
    };
    use DialogueState::{
        AddingMore, AwaitingColor, AwaitingContact, AwaitingDimension, AwaitingMaterial,
        AwaitingType, Completed, Finalizing, Start,
    };

    let invalid =
        || FlowTransitionError::InvalidTransition { state: current, signal: signal.name() };

    let (to, actions) = match (current, signal) {
        (_, CancelRequested) => (Start, vec![ResetOrder, ConfirmCancellation]),
        (_, ViewRequested) => (current, vec![RenderSummary]),
        (_, RemoveRequested { .. }) => (current, vec![RemoveItem]),
        (_, QuantityChangeRequested { .. }) => (current, vec![ChangeItemQuantity]),
        (_, ModifyUnspecified) => (current, vec![ExplainModifyUsage]),
        (_, PriceRequested(_)) => (current, vec![QuotePrice]),

        (
            Start | AwaitingType | AwaitingMaterial | AwaitingColor | AwaitingDimension
            | AddingMore | Finalizing | Completed,
            NewItems(drafts),
        ) => {
            let first = drafts.first().ok_or_else(invalid)?;
            if is_single_shot(drafts) {
                (AddingMore, vec![CommitSingleShotItems, OfferMoreItems])
            } else {
                match first.next_missing() {
                    Some(field) => {
                        (DialogueState::awaiting(field), vec![StartPendingItem, AskForField(field)])
                    }
                    None => (AddingMore, vec![StartPendingItem, CommitPendingItem, OfferMoreItems]),
                }
            }
        }
        (AwaitingMaterial | AwaitingColor | AwaitingDimension, FieldsProvided(attributes)) => {
            let Some(pending) = context.pending.as_ref() else {
                return Err(FlowTransitionError::MissingPendingItem {
                    state: current,
                    signal: signal.name(),
                });
            };
            let mut merged = pending.clone();
            merged.apply(*attributes);
            after_fields(merged.next_missing())
        }
        (AwaitingMaterial | AwaitingColor | AwaitingDimension, FieldUnrecognized) => {
            let field = current.expected_field().ok_or_else(invalid)?;
            (current, vec![RepromptField(field)])
        }

        (Start, Greeting) => (Start, vec![Greet]),
        (_, Greeting) => (current.settle(), vec![Greet, PromptForState]),
        (_, NameIntroduced(_)) => (current.settle(), vec![AcknowledgeName, PromptForState]),
        (Start | AwaitingType | Completed, OrderRequested) => {
            (AwaitingType, vec![AskForField(ItemField::FurnitureType)])
        }

        (AddingMore, Affirmative) => (AwaitingType, vec![AskForField(ItemField::FurnitureType)]),
        (AddingMore, Negative) if context.has_items => (Finalizing, vec![PresentFinalSummary]),
        (AddingMore, Negative) => (AddingMore, vec![ExplainEmptyOrder]),
        (Finalizing, Affirmative) if context.has_items => (AwaitingContact, vec![AskForContact]),
        (Finalizing, Affirmative) => (AddingMore, vec![ExplainEmptyOrder]),
        (Finalizing, Negative) => (AddingMore, vec![OfferChanges]),

        (AwaitingContact, ContactProvided(_)) => {
            (Completed, vec![StoreContact, ConfirmOrder, ResetOrder])
        }
        (AwaitingContact, ContactInvalid) => (AwaitingContact, vec![RepromptContact]),

        (Start | AwaitingType | AddingMore | Finalizing | Completed, FinishRequested)
            if context.has_items =>
        {
            (Finalizing, vec![PresentFinalSummary])
        }
        (Start | AwaitingType | AddingMore | Finalizing | Completed, FinishRequested) => {
            (current.settle(), vec![ExplainEmptyOrder])
        }

        (_, Farewell) => (current.settle(), vec![SayGoodbye]),
        (_, Unrecognized) => (current.settle(), vec![PromptForState]),
        _ => return Err(invalid()),
    };

    Ok(TransitionOutcome { from: current, to, signal: signal.clone(), actions })
}
