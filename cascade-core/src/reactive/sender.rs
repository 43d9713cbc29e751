//! Deferred Assignments
//!
//! Compute functions must be fast and total. Slow work (I/O, loading
//! event lists) belongs to asynchronous collaborators, which report their
//! result later by assigning a fundamental property.
//!
//! A [`ModelSender`] is the thread-safe side of that hand-off. Any task may
//! queue assignments through it; the thread that owns the model applies
//! them with [`Model::apply_pending`](super::Model::apply_pending), each as
//! its own propagation cycle.

use thiserror::Error;
use tokio::sync::mpsc;

use crate::value::Value;

/// An assignment queued by a collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSet {
    pub name: String,
    pub value: Value,
}

/// The model that owned the channel has been dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("model instance was dropped; assignment to `{0}` discarded")]
pub struct Disconnected(pub String);

/// Cloneable, `Send` handle for queueing assignments to a model.
#[derive(Debug, Clone)]
pub struct ModelSender {
    tx: mpsc::UnboundedSender<PendingSet>,
}

impl ModelSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<PendingSet>) -> Self {
        Self { tx }
    }

    /// Queue `name = value`. Validation happens when the owner applies it.
    pub fn set(
        &self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), Disconnected> {
        let pending = PendingSet {
            name: name.into(),
            value: value.into(),
        };
        self.tx
            .send(pending)
            .map_err(|mpsc::error::SendError(p)| Disconnected(p.name))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
