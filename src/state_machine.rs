//! Requisition conversation state machine
//!
//! Pure state transitions; collaborator I/O is requested through effects
//! and answered with follow-up events.

mod effect;
pub mod event;
mod reply;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{Event, SupplierNotice};
pub use state::{ConvState, Phase};
pub use transition::{transition, TransitionError};
