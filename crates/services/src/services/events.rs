//! Record-change notifications.
//!
//! Every successful mutation publishes one event; any number of consumers
//! (the SSE route, background refreshers) subscribe independently. Replaces
//! a shared "needs refresh" flag with an explicit broadcast channel so each
//! view refreshes exactly when something it shows has changed.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tokio::sync::broadcast;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Client,
    Project,
    Task,
    Meeting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MutationOp {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct RecordEvent {
    pub entity: EntityKind,
    pub op: MutationOp,
    pub id: i64,
}

impl RecordEvent {
    pub fn new(entity: EntityKind, op: MutationOp, id: i64) -> Self {
        Self { entity, op, id }
    }
}

const DEFAULT_CAPACITY: usize = 256;

/// Broadcast bus for record-change events. Cloning shares the channel.
#[derive(Clone)]
pub struct EventService {
    tx: broadcast::Sender<RecordEvent>,
}

impl EventService {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish to all current subscribers. Sending never blocks; with no
    /// subscribers the event is simply discarded.
    pub fn publish(&self, event: RecordEvent) {
        tracing::debug!(
            entity = %event.entity,
            op = %event.op,
            id = event.id,
            "record event"
        );
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecordEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventService {
    fn default() -> Self {
        Self::new()
    }
}
