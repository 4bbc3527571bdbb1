//! The audio output seam.
//!
//! The engine drives exactly one output through [`AudioOutputPort`] and
//! learns what actually happened from the [`MediaEvent`]s the output reports.
//! `RodioOutput` is the desktop implementation; tests use an in-memory fake.

mod port;
mod rodio_output;
mod sink;

pub use port::{AudioOutputPort, MediaEvent};
pub use rodio_output::RodioOutput;
