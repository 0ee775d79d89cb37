//! Requisition form schema
//!
//! The fixed sequence of fields a session walks through, the command
//! keywords recognised at each step, and the ordered map of answers.

use crate::db::RequisitionFields;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Fields of the requisition form, in the order they are asked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    RequesterInformation,
    ItemDetails,
    BusinessJustification,
    RequiredByDate,
    SupplierPreference,
    ApprovalSection,
}

/// The ordered field sequence
pub const FIELDS: [FormField; 6] = [
    FormField::RequesterInformation,
    FormField::ItemDetails,
    FormField::BusinessJustification,
    FormField::RequiredByDate,
    FormField::SupplierPreference,
    FormField::ApprovalSection,
];

/// Keys injected when a supplier resolves against the directory
pub const SUPPLIER_NAME: &str = "Supplier Name";
pub const SUPPLIER_ADDRESS: &str = "Supplier Address";
pub const SUPPLIER_CONTACT: &str = "Supplier Contact";

/// Value stored for a skipped supplier preference
pub const NO_SUPPLIER: &str = "N/A";

const RESTART_COMMANDS: [&str; 3] = ["start", "restart", "edit"];
const SKIP_COMMANDS: [&str; 4] = ["skip", "none", "no preference", "blank"];
const SAVE_COMMAND: &str = "save";

impl FormField {
    /// Human-readable name, also used as the key in collected fields
    pub fn label(self) -> &'static str {
        match self {
            FormField::RequesterInformation => "Requester Information",
            FormField::ItemDetails => "Item/Service Details",
            FormField::BusinessJustification => "Business Justification",
            FormField::RequiredByDate => "Required By Date",
            FormField::SupplierPreference => "Supplier Preference",
            FormField::ApprovalSection => "Approval Section",
        }
    }

    /// Position of this field in [`FIELDS`]
    pub fn position(self) -> usize {
        FIELDS.iter().position(|f| *f == self).unwrap_or(FIELDS.len())
    }
}

/// A normalised command word recognised in user input.
///
/// Matching is on the trimmed, lowercased input and must be exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Restart,
    Skip,
    Save,
}

impl Command {
    /// Classify raw input. `skip` and `save` are only meaningful at the
    /// supplier field and confirmation screen respectively; the caller
    /// decides which ones apply.
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_lowercase();
        let word = normalized.as_str();
        if RESTART_COMMANDS.contains(&word) {
            Some(Command::Restart)
        } else if SKIP_COMMANDS.contains(&word) {
            Some(Command::Skip)
        } else if word == SAVE_COMMAND {
            Some(Command::Save)
        } else {
            None
        }
    }
}

/// Answers collected so far, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedFields {
    entries: Vec<(String, String)>,
}

impl CollectedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value. Re-setting an existing key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[cfg(test)]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Project onto the persisted requisition columns. Keys that were
    /// never collected come out as `None`.
    pub fn to_requisition(&self) -> RequisitionFields {
        let column = |key: &str| self.get(key).map(String::from);
        RequisitionFields {
            requester_info: column(FormField::RequesterInformation.label()),
            item_details: column(FormField::ItemDetails.label()),
            business_justification: column(FormField::BusinessJustification.label()),
            required_by_date: column(FormField::RequiredByDate.label()),
            approver: column(FormField::ApprovalSection.label()),
            supplier_name: column(SUPPLIER_NAME),
            supplier_address: column(SUPPLIER_ADDRESS),
            supplier_contact: column(SUPPLIER_CONTACT),
        }
    }
}

impl Serialize for CollectedFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
