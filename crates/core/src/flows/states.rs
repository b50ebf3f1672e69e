use serde::{Deserialize, Serialize};

use crate::catalog::{Color, FurnitureType, Material};
use crate::domain::order::{ItemAttributes, ItemField, PendingItem};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    #[default]
    Start,
    AwaitingType,
    AwaitingMaterial,
    AwaitingColor,
    AwaitingDimension,
    AddingMore,
    Finalizing,
    AwaitingContact,
    Completed,
}

impl DialogueState {
    pub fn awaiting(field: ItemField) -> Self {
        match field {
            ItemField::FurnitureType => Self::AwaitingType,
            ItemField::Material => Self::AwaitingMaterial,
            ItemField::Color => Self::AwaitingColor,
            ItemField::Dimension => Self::AwaitingDimension,
        }
    }

    /// The item field a slot-filling state is waiting for.
    pub fn expected_field(self) -> Option<ItemField> {
        match self {
            Self::AwaitingMaterial => Some(ItemField::Material),
            Self::AwaitingColor => Some(ItemField::Color),
            Self::AwaitingDimension => Some(ItemField::Dimension),
            _ => None,
        }
    }

    pub fn accepts_new_item(self) -> bool {
        matches!(
            self,
            Self::Start | Self::AwaitingType | Self::AddingMore | Self::Finalizing | Self::Completed
        )
    }

    /// `Completed` is terminal for one order; the dialogue continues from `Start`.
    pub fn settle(self) -> Self {
        match self {
            Self::Completed => Self::Start,
            other => other,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuery {
    pub furniture_type: Option<FurnitureType>,
    pub material: Option<Material>,
    pub color: Option<Color>,
}

/// What one user message means for the dialogue, after intent and entities
/// have been read against the current state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogueSignal {
    Greeting,
    NameIntroduced(String),
    OrderRequested,
    NewItems(Vec<PendingItem>),
    FieldsProvided(ItemAttributes),
    FieldUnrecognized,
    Affirmative,
    Negative,
    ContactProvided(String),
    ContactInvalid,
    RemoveRequested { position: usize },
    QuantityChangeRequested { position: usize, quantity: u32 },
    ModifyUnspecified,
    ViewRequested,
    PriceRequested(PriceQuery),
    FinishRequested,
    Farewell,
    CancelRequested,
    Unrecognized,
}

impl DialogueSignal {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::NameIntroduced(_) => "name_introduced",
            Self::OrderRequested => "order_requested",
            Self::NewItems(_) => "new_items",
            Self::FieldsProvided(_) => "fields_provided",
            Self::FieldUnrecognized => "field_unrecognized",
            Self::Affirmative => "affirmative",
            Self::Negative => "negative",
            Self::ContactProvided(_) => "contact_provided",
            Self::ContactInvalid => "contact_invalid",
            Self::RemoveRequested { .. } => "remove_requested",
            Self::QuantityChangeRequested { .. } => "quantity_change_requested",
            Self::ModifyUnspecified => "modify_unspecified",
            Self::ViewRequested => "view_requested",
            Self::PriceRequested(_) => "price_requested",
            Self::FinishRequested => "finish_requested",
            Self::Farewell => "farewell",
            Self::CancelRequested => "cancel_requested",
            Self::Unrecognized => "unrecognized",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueContext {
    pub has_items: bool,
    pub pending: Option<PendingItem>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogueAction {
    Greet,
    AcknowledgeName,
    PromptForState,
    AskForField(ItemField),
    RepromptField(ItemField),
    StartPendingItem,
    ApplyFields,
    CommitPendingItem,
    CommitSingleShotItems,
    OfferMoreItems,
    PresentFinalSummary,
    ExplainEmptyOrder,
    OfferChanges,
    AskForContact,
    RepromptContact,
    StoreContact,
    ConfirmOrder,
    ResetOrder,
    ConfirmCancellation,
    RemoveItem,
    ChangeItemQuantity,
    ExplainModifyUsage,
    RenderSummary,
    QuotePrice,
    SayGoodbye,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: DialogueState,
    pub to: DialogueState,
    pub signal: DialogueSignal,
    pub actions: Vec<DialogueAction>,
}
