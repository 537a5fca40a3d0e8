//! Infrastructure layer for claude-web
//!
//! This crate contains the HTTP adapter that implements the `ChatGateway`
//! port defined in the application layer, plus configuration loading.

pub mod claude;
pub mod config;

// Re-export commonly used types
pub use claude::{
    error::{ClaudeWebError, Result},
    gateway::ClaudeWebGateway,
    stream::{read_completion, read_completion_body},
};
pub use config::{ClientConfig, ConfigIssue, ConfigLoader};
