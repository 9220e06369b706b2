//! LLM answer synthesis — DeepSeek chat-completions client and prompts.

pub mod client;
pub mod prompt;

pub use client::{ChatMessage, DeepSeekClient, DeepSeekConfig};
