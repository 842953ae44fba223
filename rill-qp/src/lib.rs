//! # Rill Queue Processor
//!
//! Takes drops posted onto the drop queue by channel adapters and posts
//! them for metadata extraction. Extractor replies are joined back onto
//! the in-flight drop by correlation id; drops that finish media and
//! semantic extraction are forwarded to the rules engine, and fully
//! processed drops are batched for posting to the archival REST API.
//!
//! The broker and the archival API are reached only through the traits in
//! [`transport`] and [`archive`]; wiring a concrete client is the host
//! binary's job.

pub mod archive;
pub mod drop_handler;
pub mod drop_publisher;
pub mod response_handler;
pub mod rules_publisher;
pub mod store;
pub mod transport;

pub use drop_handler::DropHandler;
pub use drop_publisher::DropPublisher;
pub use response_handler::ResponseHandler;
pub use rules_publisher::RulesPublisher;
pub use store::{DropStore, MergeOutcome};
pub use transport::{AckChannel, DeliveryFrame, StageDispatcher};
