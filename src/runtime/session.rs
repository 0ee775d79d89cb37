//! In-memory session store
//!
//! One slot per session key. The map lock is only held to find or insert a
//! slot; each slot has its own mutex, held for a whole message so that
//! transitions for one key are serialized and replies come back in order.

use crate::state_machine::ConvState;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

type Slot = Arc<Mutex<Option<ConvState>>>;

/// Process-lifetime map from session key to conversation state
#[derive(Default)]
pub struct SessionStore {
    slots: RwLock<HashMap<String, Slot>>,
}

/// Exclusive access to one session's state
pub struct SessionGuard {
    slot: OwnedMutexGuard<Option<ConvState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the session for `key`, creating an empty slot on first use.
    /// Waits behind any message already in flight for the same key.
    pub async fn lock(&self, key: &str) -> SessionGuard {
        let slot = self.slot(key).await;
        SessionGuard {
            slot: slot.lock_owned().await,
        }
    }

    async fn slot(&self, key: &str) -> Slot {
        {
            let slots = self.slots.read().await;
            if let Some(slot) = slots.get(key) {
                return Arc::clone(slot);
            }
        }

        let mut slots = self.slots.write().await;
        Arc::clone(slots.entry(key.to_string()).or_default())
    }

    /// Number of known session keys
    pub async fn session_count(&self) -> usize {
        self.slots.read().await.len()
    }
}

impl SessionGuard {
    /// True until a state has been committed for this key
    pub fn is_fresh(&self) -> bool {
        self.slot.is_none()
    }

    /// Current state; a session without one starts at the first field
    pub fn current(&self) -> ConvState {
        self.slot.clone().unwrap_or_default()
    }

    /// Replace the session's state
    pub fn commit(&mut self, state: ConvState) {
        *self.slot = Some(state);
    }
}
