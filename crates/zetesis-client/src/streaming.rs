//! Newline-delimited JSON fragment decoding for streaming search calls.
//!
//! The service streams partial results as one JSON object per line over a
//! chunked body. A corrupt line must not abort an otherwise-healthy stream,
//! so malformed fragments are skipped (logged at debug), while transport
//! errors terminate the sequence with an error item.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Lines, Read};
use std::pin::Pin;

use futures::{Stream, StreamExt};
use serde_json::{Map, Value};
use zetesis_types::{Error, Result};

/// One partial unit of a streamed response, decoded independently.
pub type Fragment = Map<String, Value>;

/// Lazy, finite, non-restartable sequence of fragments.
///
/// The stream owns the underlying HTTP response: dropping it at any point,
/// including an early `break`, closes the transport connection.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<Fragment>> + Send>>;

fn decode_line(line: &str) -> Option<Fragment> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            tracing::debug!(fragment = %other, "skipping non-object stream fragment");
            None
        }
        Err(err) => {
            tracing::debug!(%err, "skipping malformed stream fragment");
            None
        }
    }
}

/// Decode an async response body into a fragment stream.
pub fn decode_fragment_stream(response: reqwest::Response) -> FragmentStream {
    let stream = response.bytes_stream();

    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(stream);
        let mut buffer = VecDeque::with_capacity(8192);

        while let Some(chunk_result) = byte_chunks.next().await {
            match chunk_result {
                Ok(bytes) => {
                    buffer.extend(bytes);

                    while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                        let line_bytes: Vec<u8> = buffer.drain(..=newline_pos).collect();
                        if let Ok(line) = std::str::from_utf8(&line_bytes) {
                            if let Some(fragment) = decode_line(line) {
                                yield Ok(fragment);
                            }
                        }
                    }
                }
                Err(err) => {
                    yield Err(Error::Network(format!("stream read failed: {err}")));
                    return;
                }
            }
        }

        // The final line may arrive without a trailing newline.
        if !buffer.is_empty() {
            let tail: Vec<u8> = buffer.drain(..).collect();
            if let Ok(line) = std::str::from_utf8(&tail) {
                if let Some(fragment) = decode_line(line) {
                    yield Ok(fragment);
                }
            }
        }
    })
}

/// Blocking fragment iterator over a line-delimited response body.
///
/// Dropping the iterator drops the response and closes the connection; a
/// transport error yields one `Err` item and ends the sequence.
pub struct Fragments<R: Read> {
    lines: Lines<BufReader<R>>,
    done: bool,
}

impl<R: Read> Fragments<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            done: false,
        }
    }
}

impl<R: Read> Iterator for Fragments<R> {
    type Item = Result<Fragment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.lines.next()? {
                Ok(line) => {
                    if let Some(fragment) = decode_line(&line) {
                        return Some(Ok(fragment));
                    }
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(Error::Network(format!("stream read failed: {err}"))));
                }
            }
        }
    }
}
