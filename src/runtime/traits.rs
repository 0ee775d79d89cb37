//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the runtime with mock implementations.

use crate::db::{Database, DbError, Requisition, RequisitionFields, SupplierLookup};
use async_trait::async_trait;
use std::sync::Arc;

/// Reference table of suppliers
#[async_trait]
pub trait SupplierDirectory: Send + Sync {
    /// Exact, case-insensitive lookup by name. Connectivity problems come
    /// back as [`SupplierLookup::Unavailable`].
    async fn find(&self, name: &str) -> SupplierLookup;

    /// Names of all suppliers that are not blacklisted
    async fn list_approved(&self) -> Result<Vec<String>, String>;
}

/// Append-only storage for completed forms
#[async_trait]
pub trait RequisitionStore: Send + Sync {
    /// Persist a requisition, returning its id
    async fn insert(&self, fields: &RequisitionFields) -> Result<i64, String>;

    /// All requisitions, newest first
    async fn list(&self) -> Result<Vec<Requisition>, String>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SupplierDirectory + ?Sized> SupplierDirectory for Arc<T> {
    async fn find(&self, name: &str) -> SupplierLookup {
        (**self).find(name).await
    }

    async fn list_approved(&self) -> Result<Vec<String>, String> {
        (**self).list_approved().await
    }
}

#[async_trait]
impl<T: RequisitionStore + ?Sized> RequisitionStore for Arc<T> {
    async fn insert(&self, fields: &RequisitionFields) -> Result<i64, String> {
        (**self).insert(fields).await
    }

    async fn list(&self) -> Result<Vec<Requisition>, String> {
        (**self).list().await
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

/// Adapter to use Database as both directory and store.
///
/// `rusqlite` is synchronous, so every call runs on the blocking pool.
#[derive(Clone)]
pub struct DatabaseStorage {
    db: Database,
}

impl DatabaseStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, String>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, DbError> + Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(|e| format!("Database task failed: {e}"))?
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl SupplierDirectory for DatabaseStorage {
    async fn find(&self, name: &str) -> SupplierLookup {
        let query = name.to_string();
        let result = self
            .blocking({
                let query = query.clone();
                move |db: &Database| db.find_supplier(&query)
            })
            .await;

        match result {
            Ok(Some(record)) if record.is_blacklisted => SupplierLookup::Blacklisted(query),
            Ok(Some(record)) => SupplierLookup::Found(record),
            Ok(None) => SupplierLookup::NotFound(query),
            Err(e) => SupplierLookup::Unavailable(e),
        }
    }

    async fn list_approved(&self) -> Result<Vec<String>, String> {
        self.blocking(Database::list_approved_suppliers).await
    }
}

#[async_trait]
impl RequisitionStore for DatabaseStorage {
    async fn insert(&self, fields: &RequisitionFields) -> Result<i64, String> {
        let fields = fields.clone();
        self.blocking(move |db: &Database| db.insert_requisition(&fields)).await
    }

    async fn list(&self) -> Result<Vec<Requisition>, String> {
        self.blocking(Database::list_requisitions).await
    }
}
