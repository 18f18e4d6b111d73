//! # Docclaw Core
//!
//! Shared foundation for the docclaw workspace: configuration, the error
//! taxonomy, plain data types, and the collaborator traits the retrieval
//! engine consumes (document loading, embedding, answer generation).

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::DocclawConfig;
pub use error::{DocclawError, Result};
