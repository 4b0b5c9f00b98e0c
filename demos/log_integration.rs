//! Example demonstrating log integration with status lines.
//!
//! Run with: cargo run --example log_integration --features log

use log::{debug, error, info, warn};
use std::{thread, time::Duration};
use tickline::progress::{Session, init_log_integration};

fn main() {
    let session = Session::default();
    // Must be called before any logging
    init_log_integration(session.clone());

    info!("Starting application");

    let mut worker = session.init(50);
    for i in 0..50 {
        thread::sleep(Duration::from_millis(40));

        if worker.record(1) {
            let _ = session.write_status("{{ throbber() }} Processing items [{{ bar(len=30) }}] {{ percent() }}");
        }

        // The status lines are cleared before each message and drawn again
        // on the next publish
        match i {
            10 => debug!("Debug: processed item {}", i + 1),
            20 => info!("Info: almost halfway there!"),
            30 => warn!("Warning: item {} took longer than expected", i + 1),
            40 => error!("Error: simulated error at item {}", i + 1),
            _ => {}
        }
    }

    session.clear().unwrap();
    info!("Application complete");
}
