//! Application layer for claude-web
//!
//! This crate contains the gateway port and the chat client use case.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::chat_gateway::{ChatGateway, CompletionStream, GatewayError};
pub use use_cases::chat_client::{ChatClient, ChatClientError};
