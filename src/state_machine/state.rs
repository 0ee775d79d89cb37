//! Conversation state types

use crate::form::{CollectedFields, FormField, FIELDS};

/// Where a session is in the form.
///
/// The cursor only exists while collecting; the other phases pin it to a
/// fixed position so it can never disagree with the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Asking for `FIELDS[cursor]`; always `cursor < FIELDS.len()`
    Collecting { cursor: usize },

    /// A supplier name was rejected; waiting for another name or `skip`
    AwaitingSupplierResolution,

    /// Every field is answered; waiting for `save` or anything else
    Confirming,
}

/// Conversation state for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvState {
    pub phase: Phase,
    pub collected: CollectedFields,
}

impl Default for ConvState {
    fn default() -> Self {
        Self {
            phase: Phase::Collecting { cursor: 0 },
            collected: CollectedFields::new(),
        }
    }
}

impl ConvState {
    /// Index of the next unanswered field; `FIELDS.len()` once confirming
    pub fn field_cursor(&self) -> usize {
        match self.phase {
            Phase::Collecting { cursor } => cursor,
            Phase::AwaitingSupplierResolution => FormField::SupplierPreference.position(),
            Phase::Confirming => FIELDS.len(),
        }
    }

    /// The field the next input answers, if any
    pub fn current_field(&self) -> Option<FormField> {
        match self.phase {
            Phase::Collecting { cursor } => FIELDS.get(cursor).copied(),
            Phase::AwaitingSupplierResolution => Some(FormField::SupplierPreference),
            Phase::Confirming => None,
        }
    }

    /// Whether input is currently interpreted as a supplier name
    pub fn resolving_supplier(&self) -> bool {
        self.current_field() == Some(FormField::SupplierPreference)
    }

    /// Move past the current field with the given answers
    pub fn advanced(&self, collected: CollectedFields) -> Self {
        let next = self.field_cursor() + 1;
        let phase = if next >= FIELDS.len() {
            Phase::Confirming
        } else {
            Phase::Collecting { cursor: next }
        };
        Self { phase, collected }
    }

    /// Short phase name for logs
    pub fn phase_name(&self) -> &'static str {
        match self.phase {
            Phase::Collecting { .. } => "collecting",
            Phase::AwaitingSupplierResolution => "awaiting_supplier_resolution",
            Phase::Confirming => "confirming",
        }
    }
}
