//! HTTP API for the requisition chat service
//!
//! `POST /chat` drives a conversation, `GET /forms` lists saved requisitions
//! and every other path answers with a short informational message.

mod handlers;
mod types;

pub use handlers::create_router;

use crate::db::Database;
use crate::runtime::{DatabaseStorage, ProductionRuntime};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<ProductionRuntime>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        let storage = DatabaseStorage::new(db);
        Self {
            runtime: Arc::new(ProductionRuntime::new(storage.clone(), storage)),
        }
    }
}
