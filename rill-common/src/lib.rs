//! # Rill Common Library
//!
//! Shared code for the rill drop pipeline:
//! - Drop data model and metadata response types
//! - Archival API submission types
//! - Configuration loading
//! - Common error types

pub mod api;
pub mod config;
pub mod error;
pub mod model;

pub use error::{Error, Result};
