//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ChatModel`]: models accepted by the completion endpoint
//! - [`error::DomainError`]: validation errors raised before any I/O
//! - [`error::ProtocolError`]: remote protocol violations

pub mod error;
pub mod model;
