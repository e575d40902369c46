use std::io;

use channel_slice_lab::{lessons, telemetry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    lessons::signal_handoff(&mut out)?;
    Ok(())
}
