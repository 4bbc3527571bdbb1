//! Play-history notifications.
//!
//! The engine tells a [`HistoryRecorder`] whenever a track starts through
//! one of the notifying paths. Recording is fire-and-forget: the engine never
//! waits on, or reacts to, what the recorder does with the entry.

mod jsonl;
mod model;

pub use jsonl::{HistoryRecord, JsonlHistoryRecorder};
pub use model::{AdvanceTrigger, HistoryEntry, PlaySource};

/// Receives "track started" notifications.
pub trait HistoryRecorder {
    fn notify(&mut self, entry: HistoryEntry);
}

impl<R: HistoryRecorder + ?Sized> HistoryRecorder for Box<R> {
    fn notify(&mut self, entry: HistoryEntry) {
        (**self).notify(entry);
    }
}

/// Discards every entry; used when history is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHistoryRecorder;

impl HistoryRecorder for NullHistoryRecorder {
    fn notify(&mut self, _entry: HistoryEntry) {}
}

#[cfg(test)]
mod tests;
