//! Form runtime executor

use super::session::SessionStore;
use super::traits::{RequisitionStore, SupplierDirectory};
use super::RuntimeError;
use crate::state_machine::{transition, ConvState, Effect, Event};
use std::sync::Arc;

/// Drives conversations for every session against a directory and a store
pub struct FormRuntime<D, R>
where
    D: SupplierDirectory + 'static,
    R: RequisitionStore + 'static,
{
    sessions: SessionStore,
    directory: Arc<D>,
    store: Arc<R>,
}

impl<D, R> FormRuntime<D, R>
where
    D: SupplierDirectory + 'static,
    R: RequisitionStore + 'static,
{
    pub fn new(directory: D, store: R) -> Self {
        Self {
            sessions: SessionStore::new(),
            directory: Arc::new(directory),
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    /// Handle one inbound message and return the reply text.
    ///
    /// The session stays locked for the whole exchange. State is only
    /// written back when every effect succeeded, so a failed lookup or save
    /// leaves the session exactly as it was.
    pub async fn handle_message(
        &self,
        session_key: &str,
        text: &str,
    ) -> Result<String, RuntimeError> {
        let mut session = self.sessions.lock(session_key).await;

        let event = if session.is_fresh() {
            let sessions = self.sessions.session_count().await;
            tracing::info!(session = %session_key, sessions, "Opening new session");
            Event::SessionOpened
        } else {
            Event::UserMessage {
                text: text.to_string(),
            }
        };

        let before = session.current();
        let (staged, reply) = self.run(before.clone(), event).await.inspect_err(|e| {
            tracing::warn!(
                session = %session_key,
                phase = before.phase_name(),
                error = %e,
                "Message failed, session unchanged"
            );
        })?;

        tracing::debug!(
            session = %session_key,
            from = before.phase_name(),
            to = staged.phase_name(),
            cursor = staged.field_cursor(),
            "Session transitioned"
        );

        session.commit(staged);
        Ok(reply)
    }

    /// Run the transition loop on a staged copy of the state
    async fn run(
        &self,
        state: ConvState,
        event: Event,
    ) -> Result<(ConvState, String), RuntimeError> {
        let mut staged = state;
        let mut reply = None;
        let mut events = vec![event];

        while let Some(current_event) = events.pop() {
            let result = transition(&staged, current_event)?;
            staged = result.new_state;

            for effect in result.effects {
                match effect {
                    Effect::Reply { text } => reply = Some(text),
                    other => {
                        if let Some(generated) = self.execute_effect(other).await? {
                            events.push(generated);
                        }
                    }
                }
            }
        }

        let reply = reply.ok_or_else(|| RuntimeError::Internal("No reply produced".to_string()))?;
        Ok((staged, reply))
    }

    async fn execute_effect(&self, effect: Effect) -> Result<Option<Event>, RuntimeError> {
        match effect {
            Effect::LookupSupplier { query } => {
                let outcome = self.directory.find(&query).await;
                tracing::debug!(query = %query, outcome = ?outcome, "Supplier lookup");
                Ok(Some(Event::SupplierLookedUp { outcome }))
            }
            Effect::ListApprovedSuppliers { notice } => {
                let names = self
                    .directory
                    .list_approved()
                    .await
                    .map_err(RuntimeError::Unavailable)?;
                Ok(Some(Event::ApprovedSuppliersListed { notice, names }))
            }
            Effect::SaveRequisition { fields } => {
                let id = self
                    .store
                    .insert(&fields)
                    .await
                    .map_err(RuntimeError::Unavailable)?;
                tracing::info!(requisition_id = id, "Requisition saved");
                Ok(Some(Event::RequisitionSaved))
            }
            Effect::Reply { .. } => Ok(None),
        }
    }
}
