//! Pure state transition function
//!
//! Given the same state and event this always produces the same result and
//! performs no I/O. Directory lookups and saves come back as effects.

use super::reply;
use super::{ConvState, Effect, Event, Phase, SupplierNotice};
use crate::db::{SupplierLookup, SupplierRecord};
use crate::form::{
    Command, FormField, NO_SUPPLIER, SUPPLIER_ADDRESS, SUPPLIER_CONTACT, SUPPLIER_NAME,
};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Move to `state` and reply with whatever it asks next
    fn prompting(state: ConvState) -> Self {
        let text = reply::next_prompt(&state);
        Self::new(state).with_effect(Effect::reply(text))
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Supplier directory unavailable: {0}")]
    DirectoryUnavailable(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition(state: &ConvState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (&state.phase, event) {
        // ============================================================
        // Session lifecycle
        // ============================================================
        (_, Event::SessionOpened) => {
            Ok(TransitionResult::new(ConvState::default()).with_effect(Effect::reply(reply::greeting())))
        }

        (phase, Event::UserMessage { text }) => {
            let input = text.trim();
            let command = Command::parse(input);

            // Restart wins over everything, including the confirmation screen
            if command == Some(Command::Restart) {
                return Ok(TransitionResult::new(ConvState::default())
                    .with_effect(Effect::reply(reply::greeting())));
            }

            match phase {
                Phase::Confirming if command == Some(Command::Save) => {
                    Ok(TransitionResult::new(state.clone()).with_effect(Effect::SaveRequisition {
                        fields: state.collected.to_requisition(),
                    }))
                }
                // Anything other than save discards the form
                Phase::Confirming => Ok(TransitionResult::new(ConvState::default())
                    .with_effect(Effect::reply(reply::start_over()))),
                Phase::Collecting { .. } | Phase::AwaitingSupplierResolution => {
                    collect_answer(state, input, command)
                }
            }
        }

        // ============================================================
        // Supplier resolution
        // ============================================================
        (_, Event::SupplierLookedUp { outcome }) if state.resolving_supplier() => match outcome {
            SupplierLookup::Found(record) => Ok(accept_supplier(state, &record)),
            SupplierLookup::NotFound(name) => Ok(reject_supplier(state, SupplierNotice::NotFound { name })),
            SupplierLookup::Blacklisted(name) => {
                Ok(reject_supplier(state, SupplierNotice::Blacklisted { name }))
            }
            SupplierLookup::Unavailable(message) => {
                Err(TransitionError::DirectoryUnavailable(message))
            }
        },

        (Phase::AwaitingSupplierResolution, Event::ApprovedSuppliersListed { notice, names }) => {
            Ok(TransitionResult::new(state.clone())
                .with_effect(Effect::reply(reply::supplier_rejected(&notice, &names))))
        }

        // ============================================================
        // Save
        // ============================================================
        (Phase::Confirming, Event::RequisitionSaved) => {
            Ok(TransitionResult::new(ConvState::default()).with_effect(Effect::reply(reply::saved())))
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (_, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {} with event {event:?}",
            state.phase_name()
        ))),
    }
}

/// Record the answer for the current field
fn collect_answer(
    state: &ConvState,
    input: &str,
    command: Option<Command>,
) -> Result<TransitionResult, TransitionError> {
    let Some(field) = state.current_field() else {
        return Err(TransitionError::InvalidTransition(format!(
            "No field to answer in {}",
            state.phase_name()
        )));
    };

    if field != FormField::SupplierPreference {
        let mut collected = state.collected.clone();
        collected.insert(field.label(), input);
        return Ok(TransitionResult::prompting(state.advanced(collected)));
    }

    if command == Some(Command::Skip) {
        let mut collected = state.collected.clone();
        collected.insert(FormField::SupplierPreference.label(), NO_SUPPLIER);
        return Ok(TransitionResult::prompting(state.advanced(collected)));
    }

    // Nothing changes until the directory answers
    Ok(TransitionResult::new(state.clone()).with_effect(Effect::LookupSupplier {
        query: input.to_string(),
    }))
}

fn accept_supplier(state: &ConvState, record: &SupplierRecord) -> TransitionResult {
    let mut collected = state.collected.clone();
    collected.insert(FormField::SupplierPreference.label(), record.name.as_str());
    collected.insert(SUPPLIER_NAME, record.name.as_str());
    collected.insert(SUPPLIER_ADDRESS, record.address.as_str());
    collected.insert(SUPPLIER_CONTACT, record.contact.as_str());
    TransitionResult::prompting(state.advanced(collected))
}

fn reject_supplier(state: &ConvState, notice: SupplierNotice) -> TransitionResult {
    TransitionResult::new(ConvState {
        phase: Phase::AwaitingSupplierResolution,
        collected: state.collected.clone(),
    })
    .with_effect(Effect::ListApprovedSuppliers { notice })
}
