//! Single-line event parsing for the completion stream.
//!
//! Each line of the `text/event-stream` body is handled on its own:
//!
//! | Line (after trimming) | Outcome |
//! |-----------------------|---------|
//! | does not start with `data:` | [`LineOutcome::Skip`] |
//! | `data:` with empty payload | [`LineOutcome::Skip`] (keep-alive) |
//! | payload is not a JSON object | [`ProtocolError::MalformedJson`] |
//! | object without a string `completion` | [`ProtocolError::MissingField`] |
//! | `stop_reason == "stop_sequence"` | [`LineOutcome::Stop`] |
//! | anything else | [`LineOutcome::Fragment`] |

use crate::core::error::ProtocolError;
use crate::util::truncate_str;
use serde_json::Value;

/// Marker that prefixes every payload-carrying line.
pub const DATA_PREFIX: &str = "data:";

/// The only `stop_reason` value that ends the stream.
pub const STOP_SEQUENCE: &str = "stop_sequence";

/// Offending lines are cut to this many bytes inside errors.
const MAX_RAW_LINE: usize = 512;

/// What a single stream line means for the fragment sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Comment, keep-alive or unrelated line. Produces nothing.
    Skip,
    /// Next fragment to hand to the caller.
    Fragment(String),
    /// Terminal message. Its text is the last observed completion but is not
    /// emitted as a fragment.
    Stop { final_completion: String },
}

/// Parse one raw line of the event stream.
pub fn parse_event_line(raw: &[u8]) -> Result<LineOutcome, ProtocolError> {
    let line = std::str::from_utf8(raw)
        .map_err(|_| ProtocolError::InvalidUtf8)?
        .trim();

    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return Ok(LineOutcome::Skip);
    };
    let payload = payload.trim();
    if payload.is_empty() {
        return Ok(LineOutcome::Skip);
    }

    let value: Value = serde_json::from_str(payload).map_err(|e| ProtocolError::MalformedJson {
        error: e.to_string(),
        raw: truncate_str(line, MAX_RAW_LINE).to_string(),
    })?;

    let Some(object) = value.as_object() else {
        return Err(ProtocolError::MalformedJson {
            error: "expected a JSON object".to_string(),
            raw: truncate_str(line, MAX_RAW_LINE).to_string(),
        });
    };

    let completion = object
        .get("completion")
        .and_then(Value::as_str)
        .ok_or_else(|| ProtocolError::MissingField {
            field: "completion",
            raw: truncate_str(line, MAX_RAW_LINE).to_string(),
        })?
        .to_string();

    let stopped = object.get("stop_reason").and_then(Value::as_str) == Some(STOP_SEQUENCE);

    Ok(if stopped {
        LineOutcome::Stop {
            final_completion: completion,
        }
    } else {
        LineOutcome::Fragment(completion)
    })
}
