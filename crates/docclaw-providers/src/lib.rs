//! # Docclaw Providers
//!
//! Concrete implementations of the collaborator traits the retrieval engine
//! consumes:
//! - [`OpenAiCompatibleClient`] — one HTTP client for any OpenAI-compatible
//!   API (OpenAI, Ollama, LM Studio, llama.cpp server, vLLM), serving both
//!   embedding and chat-completion requests
//! - [`FileLoader`] — filesystem document loader producing ordered page texts

pub mod loader;
pub mod openai_compatible;

pub use loader::FileLoader;
pub use openai_compatible::OpenAiCompatibleClient;
