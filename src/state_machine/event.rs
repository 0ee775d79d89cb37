//! Events that can occur in a conversation

use crate::db::SupplierLookup;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // Client events
    /// First message on a session key with no state
    SessionOpened,
    UserMessage {
        text: String,
    },

    // Collaborator results
    SupplierLookedUp {
        outcome: SupplierLookup,
    },
    ApprovedSuppliersListed {
        notice: SupplierNotice,
        names: Vec<String>,
    },
    RequisitionSaved,
}

/// Why a supplier name was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupplierNotice {
    NotFound { name: String },
    Blacklisted { name: String },
}
