//! Incremental decoder from raw body chunks to completion fragments.
//!
//! Network chunks do not respect line boundaries, so bytes are buffered until
//! a `\n` arrives and only then handed to [`parse_event_line`]. At most one
//! partial line is held at a time; complete lines are decoded one by one as
//! the caller pulls, which keeps fragments in arrival order.

use super::event::{LineOutcome, parse_event_line};
use crate::core::error::ProtocolError;

/// Result of pulling from a [`CompletionDecoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The next fragment, in arrival order.
    Fragment(String),
    /// No complete line is buffered; feed more bytes or close the input.
    NeedMore,
    /// Stop signal seen or input exhausted. Nothing more will be produced.
    Done,
}

#[derive(Debug, Default)]
pub struct CompletionDecoder {
    buffer: Vec<u8>,
    closed: bool,
    done: bool,
    last_completion: Option<String>,
}

impl CompletionDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of body bytes. Ignored once the decoder is done.
    pub fn feed(&mut self, chunk: &[u8]) {
        if !self.done {
            self.buffer.extend_from_slice(chunk);
        }
    }

    /// Mark the end of input. A trailing line without `\n` is still decoded.
    pub fn close(&mut self) {
        if !self.closed && !self.buffer.is_empty() && self.buffer.last() != Some(&b'\n') {
            self.buffer.push(b'\n');
        }
        self.closed = true;
    }

    /// Stop producing anything, e.g. after the transport failed.
    pub fn abort(&mut self) {
        self.done = true;
        self.buffer.clear();
    }

    /// Pull the next item. A protocol error also ends the decoder.
    pub fn next_fragment(&mut self) -> Result<Decoded, ProtocolError> {
        while !self.done {
            let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') else {
                if self.closed {
                    self.done = true;
                    break;
                }
                return Ok(Decoded::NeedMore);
            };

            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            match parse_event_line(&line) {
                Ok(LineOutcome::Skip) => continue,
                Ok(LineOutcome::Fragment(text)) => {
                    self.last_completion = Some(text.clone());
                    return Ok(Decoded::Fragment(text));
                }
                Ok(LineOutcome::Stop { final_completion }) => {
                    self.last_completion = Some(final_completion);
                    self.abort();
                }
                Err(e) => {
                    self.abort();
                    return Err(e);
                }
            }
        }
        Ok(Decoded::Done)
    }

    /// Last `completion` text observed, including the terminal message's.
    pub fn last_completion(&self) -> Option<&str> {
        self.last_completion.as_deref()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// Decode a complete in-memory body, collecting every fragment.
pub fn decode_all(body: &[u8]) -> Result<Vec<String>, ProtocolError> {
    let mut decoder = CompletionDecoder::new();
    decoder.feed(body);
    decoder.close();

    let mut fragments = Vec::new();
    while let Decoded::Fragment(text) = decoder.next_fragment()? {
        fragments.push(text);
    }
    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_STREAM: &str = concat!(
        "data:{\"completion\":\"Hel\"}\n",
        "data:{\"completion\":\"Hello\"}\n",
        "data:{\"completion\":\"Hello!\",\"stop_reason\":\"stop_sequence\"}\n",
    );

    fn drain(decoder: &mut CompletionDecoder) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(Decoded::Fragment(text)) = decoder.next_fragment() {
            out.push(text);
        }
        out
    }

    #[test]
    fn stop_sequence_is_not_reemitted() {
        let mut decoder = CompletionDecoder::new();
        decoder.feed(HELLO_STREAM.as_bytes());

        assert_eq!(drain(&mut decoder), vec!["Hel", "Hello"]);
        assert!(decoder.is_done());
        assert_eq!(decoder.last_completion(), Some("Hello!"));
    }

    #[test]
    fn keep_alive_between_lines_adds_nothing() {
        let body = "data:{\"completion\":\"a\"}\ndata:\ndata:{\"completion\":\"b\"}\n";
        assert_eq!(decode_all(body.as_bytes()).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn non_marker_lines_are_ignored() {
        let body = ": ping\nevent: completion\n\ndata:{\"completion\":\"a\"}\n";
        assert_eq!(decode_all(body.as_bytes()).unwrap(), vec!["a"]);
    }

    #[test]
    fn lines_after_stop_are_not_read() {
        let body = format!("{HELLO_STREAM}data:{{broken\ndata:{{\"completion\":\"late\"}}\n");
        assert_eq!(decode_all(body.as_bytes()).unwrap(), vec!["Hel", "Hello"]);
    }

    #[test]
    fn end_of_stream_without_stop_is_clean() {
        let mut decoder = CompletionDecoder::new();
        decoder.feed(b"data:{\"completion\":\"a\"}\n");
        assert_eq!(
            decoder.next_fragment().unwrap(),
            Decoded::Fragment("a".to_string())
        );
        assert_eq!(decoder.next_fragment().unwrap(), Decoded::NeedMore);

        decoder.close();
        assert_eq!(decoder.next_fragment().unwrap(), Decoded::Done);
        assert_eq!(decoder.last_completion(), Some("a"));
    }

    #[test]
    fn trailing_line_without_newline_is_decoded_on_close() {
        let mut decoder = CompletionDecoder::new();
        decoder.feed(b"data:{\"completion\":\"tail\"}");
        assert_eq!(decoder.next_fragment().unwrap(), Decoded::NeedMore);

        decoder.close();
        assert_eq!(
            decoder.next_fragment().unwrap(),
            Decoded::Fragment("tail".to_string())
        );
        assert_eq!(decoder.next_fragment().unwrap(), Decoded::Done);
    }

    #[test]
    fn chunks_split_mid_line_and_mid_char() {
        let body = "data:{\"completion\":\"héllo\"}\n".as_bytes();
        // Split inside the two-byte 'é'.
        let split = body.iter().position(|&b| b == 0xc3).unwrap() + 1;

        let mut decoder = CompletionDecoder::new();
        decoder.feed(&body[..split]);
        assert_eq!(decoder.next_fragment().unwrap(), Decoded::NeedMore);
        decoder.feed(&body[split..]);
        assert_eq!(
            decoder.next_fragment().unwrap(),
            Decoded::Fragment("héllo".to_string())
        );
    }

    #[test]
    fn malformed_json_aborts_everything() {
        let mut decoder = CompletionDecoder::new();
        decoder.feed(b"data:{\"completion\":\"a\"}\ndata:{oops\ndata:{\"completion\":\"b\"}\n");

        assert_eq!(
            decoder.next_fragment().unwrap(),
            Decoded::Fragment("a".to_string())
        );
        assert!(matches!(
            decoder.next_fragment(),
            Err(ProtocolError::MalformedJson { .. })
        ));
        assert_eq!(decoder.next_fragment().unwrap(), Decoded::Done);
    }

    #[test]
    fn feed_after_done_is_ignored() {
        let mut decoder = CompletionDecoder::new();
        decoder.feed(HELLO_STREAM.as_bytes());
        drain(&mut decoder);

        decoder.feed(b"data:{\"completion\":\"ghost\"}\n");
        assert_eq!(decoder.next_fragment().unwrap(), Decoded::Done);
    }

    #[test]
    fn abort_discards_buffered_lines() {
        let mut decoder = CompletionDecoder::new();
        decoder.feed(b"data:{\"completion\":\"a\"}\n");
        decoder.abort();
        assert_eq!(decoder.next_fragment().unwrap(), Decoded::Done);
        assert_eq!(decoder.last_completion(), None);
    }
}
