//! Effects produced by state transitions

use super::event::SupplierNotice;
use crate::db::RequisitionFields;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Look a supplier name up in the directory
    LookupSupplier { query: String },

    /// Fetch the approved supplier names to show after a rejection
    ListApprovedSuppliers { notice: SupplierNotice },

    /// Persist the completed form
    SaveRequisition { fields: RequisitionFields },

    /// Text sent back to the client
    Reply { text: String },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply { text: text.into() }
    }
}
