// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events encoding of a workflow reply.
//!
//! Event format:
//! ```text
//! event: meta
//! data: {"content_type": "text/markdown", "linkify": true}
//!
//! event: text
//! data: {"text": "partial content here"}
//!
//! event: done
//! data: {}
//! ```
//!
//! The chunk stream is pulled as the client reads. A client disconnect drops
//! the body, which drops the chunk stream and cancels research.

use std::convert::Infallible;

use architect_core::ResponseChunk;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream, StreamExt};

/// Encodes one chunk as an SSE event.
pub fn chunk_event(chunk: &ResponseChunk) -> Event {
    match chunk {
        ResponseChunk::Meta(meta) => Event::default().event("meta").data(
            serde_json::json!({
                "content_type": meta.content_type,
                "linkify": meta.linkify,
            })
            .to_string(),
        ),
        ResponseChunk::Text(text) => Event::default()
            .event("text")
            .data(serde_json::json!({ "text": text }).to_string()),
    }
}

/// Terminal event closing every reply.
pub fn done_event() -> Event {
    Event::default().event("done").data("{}")
}

/// Wraps a chunk stream as an SSE response terminated by `done`.
pub fn stream_chunks<S>(chunks: S) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    S: Stream<Item = ResponseChunk> + Send + 'static,
{
    let events = chunks
        .map(|chunk| Ok(chunk_event(&chunk)))
        .chain(stream::once(async { Ok(done_event()) }));
    Sse::new(events).keep_alive(KeepAlive::default())
}
