//! Transport seam
//!
//! The processor never talks to the broker directly; everything it needs
//! is behind these two traits. `StageDispatcher` publishes a drop to one
//! destination stage with the correlation id and reply queue attached as
//! message metadata. `AckChannel` acknowledges a previously delivered
//! message on the channel that delivered it.

use async_trait::async_trait;
use rill_common::model::RawDrop;
use rill_common::Result;
use std::sync::Arc;

/// Acknowledgment capability of one transport channel.
#[async_trait]
pub trait AckChannel: Send + Sync {
    /// Acknowledge the delivery identified by `delivery_tag`.
    async fn ack(&self, delivery_tag: u64) -> Result<()>;
}

/// Publisher bound to one destination stage (the metadata exchange or the
/// rules queue). Implementations attach `correlation_id` and `reply_to`
/// as message properties, not payload fields.
#[async_trait]
pub trait StageDispatcher: Send + Sync {
    async fn dispatch(&self, drop: &RawDrop, correlation_id: &str, reply_to: &str) -> Result<()>;
}

/// Pending acknowledgment for one inbound message: the delivery tag and
/// the channel it arrived on. Parked in the drop store from ingress until
/// the drop completes every stage, then consumed exactly once.
pub struct DeliveryFrame {
    delivery_tag: u64,
    channel: Arc<dyn AckChannel>,
}

impl DeliveryFrame {
    pub fn new(delivery_tag: u64, channel: Arc<dyn AckChannel>) -> Self {
        Self {
            delivery_tag,
            channel,
        }
    }

    pub fn delivery_tag(&self) -> u64 {
        self.delivery_tag
    }

    /// Acknowledge the original message. Consumes the frame, so a tag
    /// cannot be acknowledged twice.
    pub async fn ack(self) -> Result<()> {
        self.channel.ack(self.delivery_tag).await
    }
}

impl std::fmt::Debug for DeliveryFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryFrame")
            .field("delivery_tag", &self.delivery_tag)
            .finish()
    }
}
