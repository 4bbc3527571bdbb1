//! Durable playback session.
//!
//! The session is the snapshot of queue, position and mode flags used to
//! pick up where the listener left off. It is written as a single JSON
//! document under one fixed key and read back tolerantly: anything missing
//! or malformed yields the canonical empty session.

mod model;
mod store;

pub use model::{PlaybackSession, StoredSession, decode_session, encode_session};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

#[cfg(test)]
mod tests;
