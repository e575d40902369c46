//! Two small runtime lessons:
//!
//! - `signal`: a bounded, closable slot for handing values between threads,
//!   and the zero-size `Signal` token.
//! - `sequence`: growable sequences whose views share a backing store until
//!   growth forces a reallocation.
//!
//! `lessons` holds the two programs; the binaries under `src/bin` run them
//! against stdout.

pub mod config;
pub mod lessons;
pub mod sequence;
pub mod signal;
pub mod telemetry;

pub use config::{ConfigError, LabConfig};
pub use sequence::{copy, GrowthPolicy, Seq, SeqError};
pub use signal::{Signal, Slot};
