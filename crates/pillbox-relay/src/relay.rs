use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use pillbox_codec::{daily_payload, schedule_payload};
use pillbox_core::types::{PlanEntry, Weekday};
use pillbox_store::PlanStore;

use crate::{error::RelayError, transport::Publisher};

/// Inbound sync request from the device: which user, which day.
#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub name: String,
    pub day: String,
}

/// Bridges the plan store and the outbound topic.
///
/// Owns no state of its own — the store holds the schedules, the publisher
/// holds the connection. Constructed once at startup and injected wherever a
/// schedule write needs to be mirrored to the device.
pub struct Relay {
    store: PlanStore,
    publisher: Arc<dyn Publisher>,
    outbound_topic: String,
}

impl Relay {
    pub fn new(store: PlanStore, publisher: Arc<dyn Publisher>, outbound_topic: String) -> Self {
        Self {
            store,
            publisher,
            outbound_topic,
        }
    }

    /// Publish the full snapshot after a committed schedule write.
    ///
    /// Best-effort by design: the store commit already happened, so a
    /// transport failure is logged and swallowed rather than surfaced as a
    /// request error.
    pub async fn publish_schedule(&self, user_id: i64, name: &str, entries: &[PlanEntry]) {
        let payload = schedule_payload(user_id, name, entries);
        let text = match serde_json::to_string(&payload) {
            Ok(text) => text,
            Err(e) => {
                error!(user_id, error = %e, "schedule payload serialization failed");
                return;
            }
        };
        match self.publisher.publish(&self.outbound_topic, text).await {
            Ok(()) => info!(user_id, doses = payload.schedule.len(), "schedule published"),
            Err(e) => {
                warn!(user_id, error = %e, "schedule publish failed — store write stands")
            }
        }
    }

    /// Single-consumer receive loop. Messages are handled strictly one at a
    /// time; any per-message failure is logged and the loop continues. Exits
    /// when the transport side closes the channel.
    pub async fn run(self: Arc<Self>, mut inbound: mpsc::Receiver<Vec<u8>>) {
        info!(topic = %self.outbound_topic, "sync relay started");
        while let Some(raw) = inbound.recv().await {
            if let Err(e) = self.handle_sync_request(&raw).await {
                warn!(error = %e, "sync request discarded");
            }
        }
        info!("sync relay stopped");
    }

    /// Answer one `{name, day}` request with that user's daily schedule.
    ///
    /// An unknown user is a silent discard (`Ok`), not an error — devices may
    /// ask about users that were deleted since their last sync.
    async fn handle_sync_request(&self, raw: &[u8]) -> Result<(), RelayError> {
        let request: SyncRequest =
            serde_json::from_slice(raw).map_err(|e| RelayError::Parse(e.to_string()))?;
        let day: Weekday = request.day.parse().map_err(RelayError::Parse)?;

        let Some(user) = self.store.find_user_by_name(&request.name)? else {
            debug!(name = %request.name, "sync request for unknown user discarded");
            return Ok(());
        };

        let entries = self.store.plan_entries(user.user_id, Some(day))?;
        let payload = daily_payload(&user.name, day, &entries);
        let text = serde_json::to_string(&payload).map_err(|e| RelayError::Parse(e.to_string()))?;
        self.publisher.publish(&self.outbound_topic, text).await?;
        info!(user_id = user.user_id, day = %day, "sync reply published");
        Ok(())
    }
}
