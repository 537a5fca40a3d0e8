//! Domain layer for claude-web
//!
//! Identifiers, payloads and the completion stream protocol. Nothing in this
//! crate performs I/O: the event-stream decoder works on byte slices handed
//! to it by the infrastructure layer.
//!
//! # Streaming protocol
//!
//! `POST /api/append_message` answers with one `data:<json>` line per event.
//! Every event carries a `completion` text; the stream ends on
//! `stop_reason == "stop_sequence"` or when the connection closes. See
//! [`completion::event`] for the per-line rules and
//! [`completion::decoder`] for the chunk-to-fragment pipeline.

pub mod completion;
pub mod conversation;
pub mod core;
pub mod document;
pub mod util;

// Re-export commonly used types
pub use completion::{
    decoder::{CompletionDecoder, Decoded, decode_all},
    event::{DATA_PREFIX, LineOutcome, STOP_SEQUENCE, parse_event_line},
    request::{AppendMessageRequest, CompletionOptions, CompletionParams, DEFAULT_TIMEZONE},
};
pub use conversation::{
    DEFAULT_CONVERSATION_NAME,
    entities::{Attachment, ConversationSummary, Organization},
    ids::{ConversationId, OrganizationId},
};
pub use crate::core::{
    error::{DomainError, ProtocolError},
    model::ChatModel,
};
pub use document::DocumentKind;
