//! SSE HTTP handler for the web layer.
//!
//! The connection registry, message types and per-audience rendering live in the
//! `sse` crate; this module only authenticates and opens the stream.

pub(crate) mod handler;
