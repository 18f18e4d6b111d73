//! # Docclaw Engine
//!
//! The orchestration state machine tying the pipeline together:
//!
//! ```text
//! initialize: document → loader → pages → chunker → chunks
//!                → embedding backend → VectorStore
//! ask:        question → embedding backend → VectorStore top-K
//!                → context prompt → generation backend → answer + sources
//! ```
//!
//! States: `Uninitialized → Initializing → {ReadyWithGeneration |
//! ReadyRetrievalOnly}`. Once a `Ready*` state is reached there is no way
//! back; there is no re-initialization operation.
//!
//! Collaborators (loader, embedder, generator) are injected at construction
//! — the engine holds no global state.

use std::path::Path;
use std::sync::Arc;

use docclaw_core::config::DocclawConfig;
use docclaw_core::error::{DocclawError, Result};
use docclaw_core::traits::{DocumentLoader, EmbeddingBackend, GenerationBackend};
use docclaw_core::types::Metadata;
use docclaw_retrieval::{Chunker, SearchResult, VectorStore};

/// Sentinel answer returned when retrieval finds nothing.
pub const NO_MATCH_ANSWER: &str = "No relevant documents found.";

/// Separator between retrieved chunks in the context block of the prompt.
const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Initializing,
    /// Fully indexed; questions can be answered.
    ReadyWithGeneration,
    /// Embedding backend failed during initialization; the session is
    /// degraded and `ask` refuses.
    ReadyRetrievalOnly,
}

/// An answer plus the retrieved chunks it was grounded on, in
/// similarity-descending order, for citation display.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<SearchResult>,
}

/// The retrieval-augmented question answering engine.
pub struct RagEngine {
    chunker: Chunker,
    store: VectorStore,
    loader: Arc<dyn DocumentLoader>,
    embedder: Arc<dyn EmbeddingBackend>,
    generator: Arc<dyn GenerationBackend>,
    system_prompt: String,
    top_k: usize,
    state: EngineState,
    chunk_count: usize,
}

impl RagEngine {
    /// Create an engine from configuration and injected collaborators.
    ///
    /// Fails with `Config` if the chunk geometry is invalid.
    pub fn new(
        config: &DocclawConfig,
        loader: Arc<dyn DocumentLoader>,
        embedder: Arc<dyn EmbeddingBackend>,
        generator: Arc<dyn GenerationBackend>,
    ) -> Result<Self> {
        let chunker = Chunker::new(config.retrieval.chunk_size, config.retrieval.chunk_overlap)?;
        Ok(Self {
            chunker,
            store: VectorStore::new(),
            loader,
            embedder,
            generator,
            system_prompt: config.system_prompt.clone(),
            top_k: config.retrieval.top_k,
            state: EngineState::Uninitialized,
            chunk_count: 0,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Number of chunks produced by the splitter during initialization.
    ///
    /// Equals the store's entry count when initialization fully succeeded;
    /// preserved in degraded mode so a caller can still report what was
    /// parsed.
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Load, chunk, embed, and store a document.
    ///
    /// Returns `Ok(true)` when every chunk was embedded and stored
    /// (`ReadyWithGeneration`), `Ok(false)` when the embedding backend
    /// failed (`ReadyRetrievalOnly`; the store is cleared — all-or-nothing).
    /// Loader errors propagate unchanged and return the engine to
    /// `Uninitialized` so the caller may retry with a corrected path.
    pub async fn initialize(&mut self, path: &Path) -> Result<bool> {
        if self.state != EngineState::Uninitialized {
            return Err(DocclawError::InvalidState(
                "engine is already initialized".into(),
            ));
        }
        self.state = EngineState::Initializing;

        let pages = match self.loader.load(path) {
            Ok(pages) => pages,
            Err(e) => {
                self.state = EngineState::Uninitialized;
                return Err(e);
            }
        };
        tracing::info!("Loaded {} page(s) from {}", pages.len(), path.display());

        // Chunk page by page so each entry can carry its page number;
        // ids still follow global chunk order because pages are processed
        // in order.
        let mut chunks: Vec<(usize, String)> = Vec::new();
        for (page_idx, page) in pages.iter().enumerate() {
            for chunk in self.chunker.split_text(page) {
                chunks.push((page_idx + 1, chunk));
            }
        }
        self.chunk_count = chunks.len();
        tracing::info!("Split into {} chunk(s)", self.chunk_count);

        // Embedding requests are sequential, in chunk order, so ids remain
        // a contiguous order-preserving sequence.
        for (id, (page, text)) in chunks.into_iter().enumerate() {
            match self.embedder.embed(&text).await {
                Ok(embedding) => {
                    let mut meta = Metadata::new();
                    meta.insert("page".into(), page.into());
                    self.store.add(id, text, embedding, Some(meta));
                }
                Err(e) => {
                    tracing::warn!(
                        "Embedding failed on chunk {id}: {e} — continuing in retrieval-only mode"
                    );
                    // All-or-nothing: drop the partially filled store
                    self.store.clear();
                    self.state = EngineState::ReadyRetrievalOnly;
                    return Ok(false);
                }
            }
        }

        self.state = EngineState::ReadyWithGeneration;
        Ok(true)
    }

    /// Answer a question from the indexed document.
    ///
    /// Only valid in `ReadyWithGeneration`. Embeds the question, retrieves
    /// the configured top-K chunks, and requests a completion grounded on
    /// them. When retrieval comes back empty the sentinel
    /// [`NO_MATCH_ANSWER`] is returned with no sources and no generation
    /// request is made.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        match self.state {
            EngineState::ReadyWithGeneration => {}
            EngineState::ReadyRetrievalOnly => {
                return Err(DocclawError::InvalidState(
                    "generation is unavailable; session is retrieval-only".into(),
                ));
            }
            EngineState::Uninitialized | EngineState::Initializing => {
                return Err(DocclawError::InvalidState(
                    "engine is not initialized".into(),
                ));
            }
        }

        let query = self.embedder.embed(question).await?;
        let sources = self.store.search(&query, self.top_k)?;

        if sources.is_empty() {
            return Ok(Answer {
                text: NO_MATCH_ANSWER.into(),
                sources,
            });
        }

        let context = sources
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);
        let user_prompt = format!("Context:\n{context}\n\nQuestion: {question}");

        tracing::debug!(
            "Asking with {} source chunk(s), best similarity {:.3}",
            sources.len(),
            sources[0].similarity
        );
        let text = self
            .generator
            .complete(&self.system_prompt, &user_prompt)
            .await?;

        Ok(Answer { text, sources })
    }
}
