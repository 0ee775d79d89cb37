//! Database schema and types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS suppliers (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    -- lowercased name, the lookup key
    name_key TEXT NOT NULL UNIQUE,
    address TEXT,
    contact_number TEXT,
    is_blacklisted BOOLEAN NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS requisitions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    requester_info TEXT,
    item_details TEXT,
    business_justification TEXT,
    required_by_date TEXT,
    approver TEXT,
    supplier_name TEXT,
    supplier_address TEXT,
    supplier_contact TEXT,
    created_at TEXT NOT NULL
);
";

/// Supplier directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRecord {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub is_blacklisted: bool,
}

#[cfg(test)]
impl SupplierRecord {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            contact: contact.into(),
            is_blacklisted: false,
        }
    }

    pub fn blacklisted(mut self) -> Self {
        self.is_blacklisted = true;
        self
    }
}

/// Outcome of looking a supplier name up in the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupplierLookup {
    /// Approved supplier
    Found(SupplierRecord),
    /// Supplier exists but must not be used; carries the name as queried
    Blacklisted(String),
    /// No supplier with this name; carries the name as queried
    NotFound(String),
    /// The directory could not be reached
    Unavailable(String),
}

/// The persisted columns of a requisition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisitionFields {
    pub requester_info: Option<String>,
    pub item_details: Option<String>,
    pub business_justification: Option<String>,
    pub required_by_date: Option<String>,
    pub approver: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_address: Option<String>,
    pub supplier_contact: Option<String>,
}

/// A saved requisition row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requisition {
    pub id: i64,
    #[serde(flatten)]
    pub fields: RequisitionFields,
    pub created_at: DateTime<Utc>,
}
