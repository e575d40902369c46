use std::io;

use channel_slice_lab::{lessons, telemetry, LabConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    lessons::growable_view(&mut out, &LabConfig::default())?;
    Ok(())
}
