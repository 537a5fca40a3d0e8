//! Streaming completion protocol.
//!
//! - [`request::AppendMessageRequest`]: body of `POST /api/append_message`
//! - [`event::parse_event_line`]: meaning of one `data:` line
//! - [`decoder::CompletionDecoder`]: raw body chunks → ordered fragments

pub mod decoder;
pub mod event;
pub mod request;
