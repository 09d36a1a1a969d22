//! Completion provider layer
//!
//! This module provides:
//! - Chat-completion message types
//! - CompletionProvider trait for API abstraction
//! - OpenRouterClient implementation
//! - MockProvider for tests

pub mod client;
pub mod openrouter;
pub mod types;

pub use client::{CompletionProvider, MockProvider, ProviderError};
pub use openrouter::{OpenRouterClient, OpenRouterConfig};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, Usage};
