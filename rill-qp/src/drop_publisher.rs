//! Batch publisher for completed drops
//!
//! Drains the publish queue, converts the batch to the archival API
//! shape, and posts it. A failed post is retried with the same batch at a
//! fixed interval, forever: the API being down must not lose drops that
//! already finished extraction, and volumes are low enough that stalling
//! the next cycle behind the retry is acceptable. The retry wait is
//! interruptible so shutdown is never starved.

use crate::archive::ArchiveApi;
use rill_common::api::Drop;
use rill_common::model::RawDrop;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub struct DropPublisher {
    rx: UnboundedReceiver<RawDrop>,
    api: Arc<dyn ArchiveApi>,
    publish_interval: Duration,
    retry_interval: Duration,
}

impl DropPublisher {
    pub fn new(
        rx: UnboundedReceiver<RawDrop>,
        api: Arc<dyn ArchiveApi>,
        publish_interval: Duration,
        retry_interval: Duration,
    ) -> Self {
        Self {
            rx,
            api,
            publish_interval,
            retry_interval,
        }
    }

    /// Run publish cycles until cancelled. A batch mid-retry when
    /// cancellation arrives is abandoned; its original messages were
    /// already acknowledged, so whether to wait for the API instead is a
    /// deployment decision made by the caller choosing when to cancel.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!("Drop publisher started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.publish_interval) => {}
            }
            self.post_drops(&cancel).await;
        }
        info!("Drop publisher stopped");
    }

    /// Post everything currently queued as one batch. Returns without a
    /// downstream call when the queue is empty; drops queued while the
    /// batch is in flight wait for the next cycle.
    pub async fn post_drops(&mut self, cancel: &CancellationToken) {
        let mut batch: Vec<RawDrop> = Vec::new();
        while let Ok(drop) = self.rx.try_recv() {
            batch.push(drop);
        }
        if batch.is_empty() {
            return;
        }

        debug!("Posting {} drops to the API", batch.len());
        let drops: Vec<Drop> = batch.into_iter().map(Drop::from).collect();

        loop {
            match self.api.post_drops(drops.clone()).await {
                Ok(accepted) => {
                    if accepted.len() == drops.len() {
                        debug!("Successfully posted {} drops to the API", accepted.len());
                    } else {
                        warn!(
                            "API accepted {} of {} posted drops",
                            accepted.len(),
                            drops.len()
                        );
                    }
                    return;
                }
                Err(e) => {
                    error!(
                        "An error occurred while posting the drops to the API: {}. Retrying after {:?}",
                        e, self.retry_interval
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            warn!("Shutdown during publish retry; abandoning batch of {}", drops.len());
                            return;
                        }
                        _ = tokio::time::sleep(self.retry_interval) => {}
                    }
                }
            }
        }
    }
}
