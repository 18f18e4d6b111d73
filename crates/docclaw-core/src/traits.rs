//! Collaborator contracts consumed by the retrieval engine.
//!
//! The engine receives these as injected trait objects — document
//! extraction, embedding, and answer generation are external services,
//! not part of the retrieval core.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Produces an ordered sequence of page texts from a document path.
pub trait DocumentLoader: Send + Sync {
    /// Load a document and return its pages in order.
    ///
    /// Fails with [`DocclawError::NotFound`](crate::DocclawError::NotFound)
    /// if the path does not resolve to a readable document.
    fn load(&self, path: &Path) -> Result<Vec<String>>;
}

/// Turns text into a fixed-length numeric vector.
///
/// All vectors returned for one backend configuration share a single
/// dimensionality.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Embed one text. Fails with `ServiceUnavailable` if the backend is
    /// unreachable.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Produces an answer text from a system instruction and a user prompt.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Request a completion. Fails with `ServiceUnavailable` if the backend
    /// is unreachable.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
