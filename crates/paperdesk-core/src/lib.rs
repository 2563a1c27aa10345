//! # paperdesk-core
//!
//! Core types, traits, and abstractions for paperdesk.
//!
//! This crate provides the data model shared by the store, the assistant
//! backends, the workflows, and the API server.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
