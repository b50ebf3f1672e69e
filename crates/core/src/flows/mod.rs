pub mod engine;
pub mod states;

pub use engine::{is_single_shot, DialogueFlow, FlowEngine, FlowTransitionError, GuidedOrderFlow};
pub use states::{
    DialogueAction, DialogueContext, DialogueSignal, DialogueState, PriceQuery, TransitionOutcome,
};
