//! Variable change events.
//!
//! Subscribers obtain a [`VariableReceiver`] from
//! [`VariableStore::subscribe`](crate::VariableStore::subscribe) and are sent a
//! [`VariableEvent`] for every replacement or upsert.

use std::sync::mpsc;

use crate::key::RenderKey;

/// Who changed the bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Direct edit of the variable set (JSON editor, CLI flags).
    Manual,
    /// Field edit in the structured editor.
    StructuredEditor,
    /// Result of a remote title lookup.
    TitleLookup,
}

/// A variable change notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableEvent {
    /// Render key of the bindings after the change.
    pub key: RenderKey,
    /// Origin of the change.
    pub origin: ChangeOrigin,
}

/// Receiver for variable events.
///
/// Wraps a [`std::sync::mpsc::Receiver`] for synchronous event delivery.
/// Dropping the receiver unsubscribes.
pub struct VariableReceiver {
    rx: mpsc::Receiver<VariableEvent>,
}

impl VariableReceiver {
    pub(crate) fn new(rx: mpsc::Receiver<VariableEvent>) -> Self {
        Self { rx }
    }

    /// Try to receive an event without blocking.
    ///
    /// Returns `None` if no event is pending or the store is gone.
    #[must_use]
    pub fn try_recv(&self) -> Option<VariableEvent> {
        self.rx.try_recv().ok()
    }

    /// Drain all pending events.
    pub fn drain(&self) -> impl Iterator<Item = VariableEvent> + '_ {
        self.rx.try_iter()
    }
}
