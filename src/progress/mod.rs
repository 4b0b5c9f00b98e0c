//! Multi-threaded progress tracking with throttled terminal status lines.
//!
//! Workers count their own progress without synchronization. A worker only
//! touches shared state when its count crosses a *mark*, an estimate of the
//! count one publish interval ahead. At that point it merges its progress,
//! and if the publish interval has elapsed it publishes a fresh snapshot of
//! the aggregate status and erases the previous status lines. The caller then
//! prints new ones.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tickline::progress::Session;
//!
//! let session = Session::default();
//! let mut worker = session.init(10_000);
//! for _ in 0..10_000 {
//!     // ... one unit of work ...
//!     if worker.record(1) {
//!         session
//!             .write_status("{{ throbber() }} {{ percent() }} [{{ bar() }}] ETA {{ remaining() }}")
//!             .unwrap();
//!     }
//! }
//! ```
//!
//! # Multiple Workers
//!
//! The coordinating thread initializes the session with the work it does
//! itself (often none) and hands a [`Worker`] to each thread:
//!
//! ```rust,no_run
//! use std::thread;
//! use tickline::progress::{Output, SessionBuilder};
//!
//! let session = SessionBuilder::new().output(Output::Stdout).build();
//! let _main = session.init(0);
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let mut worker = session.init_worker(25_000);
//!         let session = session.clone();
//!         thread::spawn(move || {
//!             for _ in 0..25_000 {
//!                 if worker.record(1) {
//!                     let _ = session.write_status("{{ percent() }} {{ rate() }}/s");
//!                 }
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//! ```
//!
//! Any worker may win a publish, so status lines are written by whichever
//! thread's [`Worker::record`] returned `true`.
//!
//! ## Template Functions
//!
//! - `percent()` - Progress as a whole percentage (e.g., "42%")
//! - `elapsed()`, `remaining()` - Time intervals (e.g., "1m05s", "2h10m")
//! - `rate()`, `mean_rate()` - Work per second with an SI prefix (e.g., "1.50K")
//! - `bar(len=0, fill="#.", text="")` - Progress bar; `len=0` fills the
//!   leftover width, a one-character `fill` draws the filled part in reverse
//!   video
//! - `throbber(anim="|/-\\")` - Next frame of an animation
//!
//! The raw values are available as `progress`, `elapsed`, `remaining`,
//! `rate`, `mean_rate` and `width`. The `inverse` filter shows text in
//! reverse video.
//!
//! # Hold-Lock Mode
//!
//! With [`SessionBuilder::hold_lock_on_publish`], the worker that published
//! keeps every other worker out of the slow path until it calls
//! [`Session::release_lock`], so multi-line statuses are never interleaved.
//!
//! # Environment Variables
//!
//! - `TICKLINE_NO_PROGRESS=1` - Disable rendering. Workers still count and
//!   snapshots are still published.
//! - `TICKLINE_TRACE_LOG=<path>` - Append a JSONL record per publish and per
//!   written line. Escape sequences are stripped unless `TICKLINE_TRACE_RAW`
//!   is set.
//!
//! Use [`is_disabled`] to check if rendering is disabled at runtime.
//!
//! ## Log Integration
//!
//! When the `log` feature is enabled, [`ProgressLogger`] clears the status
//! lines of a session before each log message:
//!
//! ```rust,ignore
//! use tickline::progress::{Session, init_log_integration};
//!
//! let session = Session::default();
//! init_log_integration(session.clone());
//! log::info!("Starting work");
//! ```

mod clock;
mod config;
mod diagnostics;
pub mod format;
mod output;
mod render;
mod session;
mod snapshot;
mod tera_setup;
mod worker;

#[cfg(feature = "log")]
mod log;

// Re-export public API
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{
    DEFAULT_INTERVAL, DEFAULT_MAX_LINE_LEN, DEFAULT_PUBLISH_GATE, SessionBuilder, is_disabled,
};
pub use output::{EmulatedTerminal, Output};
pub use session::Session;
pub use snapshot::Snapshot;
pub use tera_setup::DEFAULT_THROBBER;
pub use worker::Worker;

#[cfg(feature = "log")]
pub use log::{
    ProgressLogger, init_log_integration, init_log_integration_with_level, try_init_log_integration,
    try_init_log_integration_with_level,
};
