//! Archival API types
//!
//! Request shapes for the archival REST API, plus the conversion from the
//! in-flight drop representation.

pub mod types;

pub use types::{Drop, DropLink, DropMedia, DropPlace, DropTag, DropThumbnail, Identity};
