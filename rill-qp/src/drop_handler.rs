//! Ingress handler for drops arriving on the drop queue
//!
//! Registers each drop in the store under a fresh correlation id and
//! publishes it for metadata extraction. The original message is not
//! acknowledged here; its delivery frame is parked in the store until
//! every extraction stage has replied.

use crate::store::DropStore;
use crate::transport::{DeliveryFrame, StageDispatcher};
use rill_common::model::RawDrop;
use rill_common::Result;
use std::sync::Arc;
use tracing::{debug, error};

pub struct DropHandler {
    store: Arc<DropStore>,
    metadata_dispatcher: Arc<dyn StageDispatcher>,
    callback_queue: String,
}

impl DropHandler {
    pub fn new(
        store: Arc<DropStore>,
        metadata_dispatcher: Arc<dyn StageDispatcher>,
        callback_queue: impl Into<String>,
    ) -> Self {
        Self {
            store,
            metadata_dispatcher,
            callback_queue: callback_queue.into(),
        }
    }

    /// Handle one drop delivered from the drop queue.
    ///
    /// A payload that fails to decode is left unacknowledged; redelivery
    /// is the broker's job. A dispatch failure likewise leaves the
    /// message unacknowledged, with the registered copy waiting for the
    /// redelivered one.
    pub async fn on_drop(&self, payload: &[u8], frame: DeliveryFrame) -> Result<()> {
        let drop: RawDrop = match serde_json::from_slice(payload) {
            Ok(drop) => drop,
            Err(e) => {
                error!("Failed to decode drop payload: {}", e);
                return Err(e.into());
            }
        };

        let correlation_id = self.store.register(drop.clone(), frame);
        debug!(
            correlation_id = %correlation_id,
            reply_to = %self.callback_queue,
            "Sending drop for metadata extraction"
        );

        self.metadata_dispatcher
            .dispatch(&drop, &correlation_id, &self.callback_queue)
            .await?;

        Ok(())
    }
}
