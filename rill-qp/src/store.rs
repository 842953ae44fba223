//! In-flight drop store
//!
//! Two correlation-keyed tables — the working copy of each drop and the
//! pending delivery frame for its original message — guarded by a single
//! mutex. Every read-modify-write that touches completion flags or moves
//! a drop between present and removed runs inside that one lock, so
//! concurrent replies for the same drop cannot double-dispatch,
//! double-ack, or lose an update.
//!
//! The store owns the sending halves of both outbound queues. Sends
//! happen while the lock is held, which is safe only because unbounded
//! channel sends never block; a bounded channel here would be a deadlock
//! waiting to happen.

use crate::transport::DeliveryFrame;
use rill_common::model::{MetadataResponse, RawDrop};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of merging one extractor reply, for the caller to act on after
/// the lock has been released.
#[derive(Debug)]
pub enum MergeOutcome {
    /// No drop in flight under that correlation id; duplicate or stale
    /// reply.
    Unknown,
    /// Merged; the drop is still waiting on at least one stage.
    Pending,
    /// Every stage replied and the drop left the store. Carries the
    /// delivery frame for the original message, which the caller must
    /// acknowledge. `None` is a bookkeeping defect, handled upstream.
    Completed { frame: Option<DeliveryFrame> },
}

struct StoreInner {
    drops: HashMap<String, RawDrop>,
    frames: HashMap<String, DeliveryFrame>,
}

/// Shared in-flight state, keyed by correlation id.
pub struct DropStore {
    inner: Mutex<StoreInner>,
    rules_tx: UnboundedSender<String>,
    publish_tx: UnboundedSender<RawDrop>,
}

impl DropStore {
    pub fn new(rules_tx: UnboundedSender<String>, publish_tx: UnboundedSender<RawDrop>) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                drops: HashMap::new(),
                frames: HashMap::new(),
            }),
            rules_tx,
            publish_tx,
        }
    }

    /// Register a newly ingested drop: mint a correlation id that is not
    /// already in use and park the drop and its delivery frame under it.
    pub fn register(&self, drop: RawDrop, frame: DeliveryFrame) -> String {
        let mut inner = self.inner.lock().expect("drop store lock poisoned");

        let mut correlation_id = Uuid::new_v4().to_string();
        while inner.drops.contains_key(&correlation_id) {
            correlation_id = Uuid::new_v4().to_string();
        }

        inner.drops.insert(correlation_id.clone(), drop);
        inner.frames.insert(correlation_id.clone(), frame);
        correlation_id
    }

    /// Current working copy of a drop, if it is still in flight.
    pub fn snapshot(&self, correlation_id: &str) -> Option<RawDrop> {
        let inner = self.inner.lock().expect("drop store lock poisoned");
        inner.drops.get(correlation_id).cloned()
    }

    /// Number of drops in flight.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().expect("drop store lock poisoned");
        inner.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge one extractor reply into its drop and advance the pipeline.
    ///
    /// Runs entirely under the store lock:
    /// - merge the stage's fields and set its completion flag;
    /// - on the merge that makes media and semantics both complete, queue
    ///   the correlation id for rules processing — a repeated stage reply
    ///   never queues it a second time;
    /// - once all three stages are complete, remove the drop and its
    ///   frame, queue the drop for publication if it has destination
    ///   rivers, and hand the frame back for acknowledgment.
    pub fn merge_response(&self, correlation_id: &str, response: MetadataResponse) -> MergeOutcome {
        let mut inner = self.inner.lock().expect("drop store lock poisoned");

        let Some(drop) = inner.drops.get_mut(correlation_id) else {
            return MergeOutcome::Unknown;
        };

        let was_ready_for_rules = drop.extraction_complete();
        drop.apply(response);

        if !was_ready_for_rules && drop.extraction_complete() {
            info!(
                correlation_id = %correlation_id,
                "Sending drop for rules processing"
            );
            if self.rules_tx.send(correlation_id.to_string()).is_err() {
                warn!(
                    correlation_id = %correlation_id,
                    "Rules queue closed; drop not forwarded"
                );
            }
        }

        if !drop.fully_complete() {
            return MergeOutcome::Pending;
        }

        let frame = inner.frames.remove(correlation_id);
        if let Some(finished) = inner.drops.remove(correlation_id) {
            if finished.river_ids.is_empty() {
                info!(
                    correlation_id = %correlation_id,
                    "No destination rivers for drop; discarding"
                );
            } else if self.publish_tx.send(finished).is_err() {
                warn!(
                    correlation_id = %correlation_id,
                    "Publish queue closed; completed drop lost"
                );
            }
        }

        MergeOutcome::Completed { frame }
    }
}
