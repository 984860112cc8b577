//! Text-generation port used by the obituary composer.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::PortError;

/// Future returned by [`LlmClient::complete`]. Boxed so the trait stays object safe.
pub type LlmFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, PortError>> + Send + 'a>>;

/// One prompt for the text-generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier, from `OBITUARY_MODEL`.
    pub model: String,
    /// Full prompt, sent as a single user message.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

/// What the service wrote back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text; may be blank, which callers treat as a failure.
    pub text: String,
    /// Tokens billed for the prompt.
    pub prompt_tokens: u32,
    /// Tokens billed for the answer.
    pub completion_tokens: u32,
}

/// Sends one completion request per obituary.
pub trait LlmClient: Send + Sync {
    /// Asks the service for a completion.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, a non-success status
    /// or an unreadable body.
    fn complete(&self, request: &CompletionRequest) -> LlmFuture<'_>;
}
