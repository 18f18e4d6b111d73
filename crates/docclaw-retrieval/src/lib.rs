//! # Docclaw Retrieval
//!
//! The algorithmic core of the pipeline:
//! - [`Chunker`] — splits documents into overlapping character windows
//! - [`VectorStore`] — thread-safe in-memory store with cosine top-K search
//!
//! Both are pure in-process components. Embedding generation lives behind
//! the `docclaw-core` backend traits, not here.

pub mod chunker;
pub mod store;

pub use chunker::Chunker;
pub use store::{Entry, SearchResult, VectorStore, cosine_similarity};
