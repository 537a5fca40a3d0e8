//! claude.ai web adapter
//!
//! Implements the `ChatGateway` port over plain HTTPS with a session cookie.
//!
//! # Architecture
//!
//! ```text
//! ClaudeWebGateway (implements ChatGateway)
//!   ├── protocol: path templates, header values, request bodies
//!   ├── stream: response body → CompletionStream (via CompletionDecoder)
//!   └── error: ClaudeWebError → GatewayError
//! ```

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod stream;

pub use error::ClaudeWebError;
pub use gateway::ClaudeWebGateway;
