//! Database module for the requisition service
//!
//! Holds the supplier directory and the saved requisitions.

mod schema;

pub use schema::*;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database connection lock poisoned")]
    LockPoisoned,
    #[error("Invalid supplier seed: {0}")]
    Seed(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Supplier names match exactly, ignoring case (full Unicode folding)
fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    fn run_migrations(&self) -> DbResult<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Supplier Directory ====================

    /// Find a supplier by exact, case-insensitive name
    pub fn find_supplier(&self, name: &str) -> DbResult<Option<SupplierRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT name, address, contact_number, is_blacklisted
             FROM suppliers WHERE name_key = ?1",
        )?;

        let record = stmt
            .query_row(params![name_key(name)], |row| {
                Ok(SupplierRecord {
                    name: row.get(0)?,
                    address: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    contact: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    is_blacklisted: row.get(3)?,
                })
            })
            .optional()?;
        Ok(record)
    }

    /// Names of all suppliers that are not blacklisted, sorted
    pub fn list_approved_suppliers(&self) -> DbResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT name FROM suppliers WHERE is_blacklisted = 0 ORDER BY name_key")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Insert a supplier, or update the existing one with the same name
    pub fn upsert_supplier(&self, supplier: &SupplierRecord) -> DbResult<()> {
        self.conn()?.execute(
            "INSERT INTO suppliers (name, name_key, address, contact_number, is_blacklisted)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(name_key) DO UPDATE SET
                name = excluded.name,
                address = excluded.address,
                contact_number = excluded.contact_number,
                is_blacklisted = excluded.is_blacklisted",
            params![
                supplier.name,
                name_key(&supplier.name),
                supplier.address,
                supplier.contact,
                supplier.is_blacklisted
            ],
        )?;
        Ok(())
    }

    /// Load suppliers from a JSON array and upsert each one
    pub fn seed_suppliers_from_json(&self, json: &str) -> DbResult<usize> {
        let suppliers: Vec<SupplierRecord> =
            serde_json::from_str(json).map_err(|e| DbError::Seed(e.to_string()))?;
        for supplier in &suppliers {
            self.upsert_supplier(supplier)?;
        }
        Ok(suppliers.len())
    }

    // ==================== Requisitions ====================

    /// Persist a completed form, returning the new row id
    pub fn insert_requisition(&self, fields: &RequisitionFields) -> DbResult<i64> {
        let conn = self.conn()?;
        let now = Utc::now();
        conn.execute(
            "INSERT INTO requisitions (requester_info, item_details, business_justification,
                required_by_date, approver, supplier_name, supplier_address, supplier_contact,
                created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                fields.requester_info,
                fields.item_details,
                fields.business_justification,
                fields.required_by_date,
                fields.approver,
                fields.supplier_name,
                fields.supplier_address,
                fields.supplier_contact,
                now.to_rfc3339()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All saved requisitions, newest first
    pub fn list_requisitions(&self) -> DbResult<Vec<Requisition>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, requester_info, item_details, business_justification, required_by_date,
                    approver, supplier_name, supplier_address, supplier_contact, created_at
             FROM requisitions ORDER BY id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Requisition {
                id: row.get(0)?,
                fields: RequisitionFields {
                    requester_info: row.get(1)?,
                    item_details: row.get(2)?,
                    business_justification: row.get(3)?,
                    required_by_date: row.get(4)?,
                    approver: row.get(5)?,
                    supplier_name: row.get(6)?,
                    supplier_address: row.get(7)?,
                    supplier_contact: row.get(8)?,
                },
                created_at: parse_datetime(&row.get::<_, String>(9)?),
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
