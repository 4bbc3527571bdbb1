//! The playback engine.
//!
//! [`PlayerService`] owns the queue, the current position, the shuffle and
//! loop policy and the output, and reconciles three sources of truth:
//! caller commands, events reported by the output, and the persisted
//! session. It is single-threaded by construction: every operation takes
//! `&mut self` and runs to completion, and output events only take effect
//! when the host feeds them in through [`PlayerService::pump`].

mod events;
mod service;
mod types;

pub use events::{PlayerEvent, PlayerSnapshot};
pub use service::PlayerService;
pub use types::{HistoryPolicy, LoopMode, PlayerOptions, PlayerPhase};
