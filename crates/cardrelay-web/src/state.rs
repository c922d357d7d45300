//! Application state and the push-channel membership registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use cardrelay_core::design::DesignIdGenerator;
use cardrelay_core::{RelayError, RelayEvent, RelayResult};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Identifier of one open push channel.
pub type ChannelId = Uuid;

/// Outbound queue of a push channel; each item is one serialized event.
pub type ChannelSender = mpsc::UnboundedSender<String>;

/// Live set of open push channels.
///
/// A channel is a member from the moment its connection is accepted until
/// it closes, errors, or fails to accept an event. The lock is only held for
/// map operations, never across an await.
#[derive(Default)]
pub struct ChannelRegistry {
    members: Mutex<HashMap<ChannelId, ChannelSender>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn members(&self) -> MutexGuard<'_, HashMap<ChannelId, ChannelSender>> {
        // Map operations cannot leave the map half-updated, so a poisoned lock is still usable.
        self.members.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a channel and return its id.
    pub fn register(&self, sender: ChannelSender) -> ChannelId {
        let id = Uuid::new_v4();
        let mut members = self.members();
        members.insert(id, sender);
        debug!(channel_id = %id, members = members.len(), "Channel registered");
        id
    }

    /// Remove a channel. Removing an unknown id is a no-op.
    pub fn unregister(&self, id: &ChannelId) -> bool {
        let mut members = self.members();
        let removed = members.remove(id).is_some();
        if removed {
            debug!(channel_id = %id, members = members.len(), "Channel unregistered");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.members().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queue an event on a single channel.
    pub fn send_to(&self, id: &ChannelId, event: &RelayEvent) -> RelayResult<()> {
        let json = event.to_json()?;
        let sender = self
            .members()
            .get(id)
            .cloned()
            .ok_or_else(|| RelayError::ChannelSend(id.to_string()))?;
        Self::deliver(id, &sender, json)
    }

    fn deliver(id: &ChannelId, sender: &ChannelSender, json: String) -> RelayResult<()> {
        sender
            .send(json)
            .map_err(|_| RelayError::ChannelSend(id.to_string()))
    }

    /// Send an event to every current member and return how many accepted it.
    ///
    /// The event is serialized once. Members that fail are pruned and the
    /// broadcast continues with the rest.
    pub fn broadcast(&self, event: &RelayEvent) -> RelayResult<usize> {
        let json = event.to_json()?;
        let snapshot: Vec<(ChannelId, ChannelSender)> = self
            .members()
            .iter()
            .map(|(id, sender)| (*id, sender.clone()))
            .collect();

        let mut delivered = 0;
        for (id, sender) in &snapshot {
            match Self::deliver(id, sender, json.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(channel_id = %id, error = %e, "Dropping unreachable channel");
                    self.unregister(id);
                }
            }
        }

        debug!(
            kind = event.kind(),
            targets = snapshot.len(),
            delivered,
            "Broadcast complete"
        );
        Ok(delivered)
    }
}

/// Application state shared across handlers.
#[derive(Clone, Default)]
pub struct AppState {
    pub channels: Arc<ChannelRegistry>,
    pub design_ids: Arc<DesignIdGenerator>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
