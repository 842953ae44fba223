//! Handler for extractor replies on the callback queue
//!
//! Routes each reply to the drop it belongs to via the correlation id
//! carried in the message properties, and acknowledges the original drop
//! message once the final stage has replied. Reply messages themselves
//! are acknowledged by the transport layer after this handler returns.

use crate::store::{DropStore, MergeOutcome};
use rill_common::model::MetadataResponse;
use rill_common::Result;
use std::sync::Arc;
use tracing::{error, info};

pub struct ResponseHandler {
    store: Arc<DropStore>,
}

impl ResponseHandler {
    pub fn new(store: Arc<DropStore>) -> Self {
        Self { store }
    }

    /// Handle one metadata reply.
    ///
    /// An unknown correlation id is a normal outcome — a duplicate
    /// delivery, or a reply landing after its drop already completed —
    /// and the reply is simply discarded. A drop completing without a
    /// parked delivery frame is a bookkeeping defect worth an error log,
    /// but processing continues and the drop still completes.
    pub async fn on_response(&self, correlation_id: &str, payload: &[u8]) -> Result<()> {
        let response: MetadataResponse = serde_json::from_slice(payload)?;
        info!(
            source = response.source(),
            correlation_id = %correlation_id,
            "Metadata response received"
        );

        match self.store.merge_response(correlation_id, response) {
            MergeOutcome::Unknown => {
                info!(
                    correlation_id = %correlation_id,
                    "No drop in flight for correlation id; discarding reply"
                );
            }
            MergeOutcome::Pending => {}
            MergeOutcome::Completed { frame: Some(frame) } => {
                frame.ack().await?;
                info!(
                    correlation_id = %correlation_id,
                    "Drop completed metadata extraction"
                );
            }
            MergeOutcome::Completed { frame: None } => {
                error!(
                    correlation_id = %correlation_id,
                    "Completed drop had no delivery frame to acknowledge"
                );
            }
        }

        Ok(())
    }
}
