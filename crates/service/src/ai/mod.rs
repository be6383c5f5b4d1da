//! LLM-backed helpers: free-form Q&A and search-term suggestions.
//!
//! `TextGenerator` is the only seam to the model provider. Each assistant
//! call makes exactly one request and degrades to a fixed fallback when the
//! request fails or the output does not fit the expected shape.

use async_trait::async_trait;

use crate::errors::ServiceError;

pub mod anthropic;
pub mod assist;

pub use anthropic::AnthropicClient;
pub use assist::AssistService;

/// A single prompt/response exchange.
#[derive(Clone, Debug)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String, ServiceError>;
}
