//! roundtable-providers — chat-completion backends for roundtable agents.
//!
//! One trait, [`ChatProvider`], and the backends the app ships with: an
//! OpenAI-compatible client, an Ollama client, and a scriptable mock for
//! tests. The agents layer adapts these into the engine's invoker seams.

pub mod catalog;
pub mod mock;
pub mod ollama;
pub mod openai_compat;
pub mod traits;

// catalog
pub use catalog::{ModelCatalog, ModelSpec};

// mock
pub use mock::MockChatProvider;

// providers
pub use ollama::OllamaProvider;
pub use openai_compat::OpenAiCompatProvider;

// traits
pub use traits::{
    ChatMessage, ChatProvider, ChatRequest, ChatResponse, FunctionCall, ProviderError,
    ProviderResult,
};
