//! Completion stream reader.
//!
//! Turns the body of an `append_message` response into a
//! [`CompletionStream`]. Chunks are pulled from the network only when the
//! consumer asks for the next fragment, and the domain
//! [`CompletionDecoder`] turns them into fragments one line at a time.
//!
//! The response body is owned by the stream, so dropping the stream closes
//! the connection.

use crate::claude::error::ClaudeWebError;
use bytes::Bytes;
use claude_web_application::{CompletionStream, GatewayError};
use claude_web_domain::util::truncate_str;
use claude_web_domain::{CompletionDecoder, Decoded};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use tracing::{debug, error, trace};

struct ReaderState {
    body: BoxStream<'static, Result<Bytes, ClaudeWebError>>,
    decoder: CompletionDecoder,
    fragments: usize,
}

/// Read fragments from a streaming response body.
pub fn read_completion(response: reqwest::Response) -> CompletionStream {
    read_completion_body(response.bytes_stream())
}

/// Read fragments from any byte stream shaped like a response body.
pub fn read_completion_body<S, E>(body: S) -> CompletionStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<ClaudeWebError> + Send + 'static,
{
    let state = ReaderState {
        body: body.map(|chunk| chunk.map_err(Into::into)).boxed(),
        decoder: CompletionDecoder::new(),
        fragments: 0,
    };

    let fragments = stream::unfold(state, |mut state| async move {
        loop {
            match state.decoder.next_fragment() {
                Ok(Decoded::Fragment(text)) => {
                    state.fragments += 1;
                    trace!("Fragment {} ({} bytes)", state.fragments, text.len());
                    return Some((Ok(text), state));
                }
                Ok(Decoded::Done) => {
                    debug!(
                        "Completion stream finished after {} fragments, last completion: {:?}",
                        state.fragments,
                        state.decoder.last_completion().map(|t| truncate_str(t, 200))
                    );
                    return None;
                }
                Err(e) => {
                    error!("Protocol error in completion stream: {}", e);
                    return Some((Err(GatewayError::Protocol(e)), state));
                }
                Ok(Decoded::NeedMore) => match state.body.next().await {
                    Some(Ok(chunk)) => state.decoder.feed(&chunk),
                    Some(Err(e)) => {
                        error!("Completion stream aborted: {}", e);
                        state.decoder.abort();
                        return Some((Err(GatewayError::from(e)), state));
                    }
                    None => state.decoder.close(),
                },
            }
        }
    });

    CompletionStream::new(fragments.fuse().boxed())
}
