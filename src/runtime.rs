//! Runtime for executing requisition conversations
//!
//! Owns the per-session state map and executes the effects the state
//! machine asks for against the supplier directory and requisition store.

mod executor;
mod session;
pub mod traits;


pub use executor::FormRuntime;
pub use traits::*;

use crate::state_machine::TransitionError;
use thiserror::Error;

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime = FormRuntime<DatabaseStorage, DatabaseStorage>;

/// Failure while handling a message. The session is left unchanged.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Backing store unavailable: {0}")]
    Unavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TransitionError> for RuntimeError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::DirectoryUnavailable(msg) => RuntimeError::Unavailable(msg),
            TransitionError::InvalidTransition(msg) => RuntimeError::Internal(msg),
        }
    }
}
