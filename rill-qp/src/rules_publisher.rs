//! Rules-stage forwarder
//!
//! Single consumer of the rules queue: for every correlation id released
//! by the join logic, look up the drop's current snapshot and publish it
//! to the rules engine under the same correlation id, so the rules reply
//! joins back onto the same in-flight entry.

use crate::store::DropStore;
use crate::transport::StageDispatcher;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

pub struct RulesPublisher {
    rx: UnboundedReceiver<String>,
    store: Arc<DropStore>,
    rules_dispatcher: Arc<dyn StageDispatcher>,
    callback_queue: String,
}

impl RulesPublisher {
    pub fn new(
        rx: UnboundedReceiver<String>,
        store: Arc<DropStore>,
        rules_dispatcher: Arc<dyn StageDispatcher>,
        callback_queue: impl Into<String>,
    ) -> Self {
        Self {
            rx,
            store,
            rules_dispatcher,
            callback_queue: callback_queue.into(),
        }
    }

    /// Consume the rules queue until cancelled or the queue closes.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!("Rules publisher started");
        loop {
            let correlation_id = tokio::select! {
                _ = cancel.cancelled() => break,
                id = self.rx.recv() => match id {
                    Some(id) => id,
                    None => break,
                },
            };
            self.forward(&correlation_id).await;
        }
        info!("Rules publisher stopped");
    }

    /// Publish one drop snapshot to the rules engine. A drop that already
    /// left the store lost a race with its own completion; skipping it is
    /// the correct no-op.
    async fn forward(&self, correlation_id: &str) {
        let Some(drop) = self.store.snapshot(correlation_id) else {
            debug!(
                correlation_id = %correlation_id,
                "Drop gone before rules dispatch; skipping"
            );
            return;
        };

        debug!(correlation_id = %correlation_id, "Publishing drop to rules queue");
        if let Err(e) = self
            .rules_dispatcher
            .dispatch(&drop, correlation_id, &self.callback_queue)
            .await
        {
            error!(
                correlation_id = %correlation_id,
                "Failed to publish drop for rules processing: {}", e
            );
        }
    }
}
