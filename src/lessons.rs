//! The two lesson programs, written against any `io::Write` so the binaries
//! and the tests run the same code.

use std::io::{self, Write};
use std::sync::Arc;
use std::thread;

use tracing::debug;

use crate::config::LabConfig;
use crate::sequence::{self, Seq, SeqError};
use crate::signal::{CloseError, Signal, Slot, SlotError};

#[derive(Debug, thiserror::Error)]
pub enum LessonError {
    #[error("failed to write lesson output: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error(transparent)]
    Close(#[from] CloseError),

    #[error(transparent)]
    Seq(#[from] SeqError),

    #[error("slot closed before a signal arrived")]
    NoSignal,

    #[error("producer could not send: slot already closed")]
    SendRejected,

    #[error("producer thread panicked")]
    ProducerPanicked,
}

/// One producer thread hands a single `Signal` to the caller through a
/// capacity-1 slot. The caller prints it and closes the slot.
pub fn signal_handoff<W: Write>(out: &mut W) -> Result<(), LessonError> {
    let slot = Arc::new(Slot::bounded(1)?);

    let producer = {
        let slot = Arc::clone(&slot);
        thread::spawn(move || slot.send(Signal))
    };

    let signal = slot.recv().ok_or(LessonError::NoSignal)?;
    writeln!(out, "{}", signal)?;
    slot.close()?;

    producer
        .join()
        .map_err(|_| LessonError::ProducerPanicked)?
        .map_err(|_| LessonError::SendRejected)?;
    debug!("handoff complete");
    Ok(())
}

/// Grow, reslice, and copy, then print the view and the destination with
/// their length and capacity.
pub fn growable_view<W: Write>(out: &mut W, config: &LabConfig) -> Result<(), LessonError> {
    writeln!(out)?;

    let seq: Seq<i64> = Seq::with_policy(0, config.initial_capacity, config.growth)?;
    let seq = seq.append(1);
    let seq = seq.append(2);
    let seq = seq.append(3);
    let seq = seq.extend([4, 5]);
    let view = seq.slice_from(2)?;

    let dst = Seq::from_vec(vec![0, 0]);
    let copied = sequence::copy(&dst, &view);
    debug!(copied, backing_cap = seq.cap(), "copied view into destination");

    writeln!(out, "{}", view.report())?;
    writeln!(out, "{}", dst.report())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::GrowthPolicy;

    fn render(config: &LabConfig) -> String {
        let mut out = Vec::new();
        growable_view(&mut out, config).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_signal_handoff_output() {
        let mut out = Vec::new();
        signal_handoff(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{}\n");
    }

    #[test]
    fn test_signal_handoff_repeats_cleanly() {
        for _ in 0..100 {
            let mut out = Vec::new();
            signal_handoff(&mut out).unwrap();
            assert_eq!(out, b"{}\n");
        }
    }

    #[test]
    fn test_growable_view_default_policy() {
        assert_eq!(render(&LabConfig::default()), "\n[3 4 5] 3 4\n[3 4] 2 2\n");
    }

    #[test]
    fn test_growable_view_exact_policy() {
        let config = LabConfig {
            growth: GrowthPolicy::Exact,
            ..LabConfig::default()
        };
        assert_eq!(render(&config), "\n[3 4 5] 3 3\n[3 4] 2 2\n");
    }

    #[test]
    fn test_growable_view_output_shape() {
        let output = render(&LabConfig::default());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "");

        let view_cap: usize = lines[1]
            .strip_prefix("[3 4 5] 3 ")
            .and_then(|cap| cap.parse().ok())
            .unwrap();
        assert!(view_cap >= 3);
        assert_eq!(lines[2], "[3 4] 2 2");
    }

    #[test]
    fn test_growable_view_is_deterministic() {
        let config = LabConfig::default();
        assert_eq!(render(&config), render(&config));
    }

    #[test]
    fn test_growable_view_zero_initial_capacity() {
        let config = LabConfig {
            initial_capacity: 0,
            ..LabConfig::default()
        };
        // 0 -> 1 -> 2 -> 4, then {4, 5} needs 5 and doubling gives 8.
        assert_eq!(render(&config), "\n[3 4 5] 3 6\n[3 4] 2 2\n");
    }
}
