//! Session configuration and environment controls.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::progress_bar::BarLimits;

use super::clock::{Clock, MonotonicClock};
use super::output::Output;
use super::session::Session;

// =============================================================================
// Environment Variable Controls
// =============================================================================

static ENV_NO_PROGRESS: OnceLock<bool> = OnceLock::new();

/// Checks if an environment variable is set to a truthy value ("1" or "true").
pub(crate) fn check_env_bool(var_name: &str) -> bool {
    std::env::var(var_name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Returns whether status rendering is disabled.
///
/// Rendering is disabled when the `TICKLINE_NO_PROGRESS` environment variable
/// is set to `1` or `true`. Workers still count and sessions still publish
/// snapshots; only terminal output is suppressed.
#[must_use]
pub fn is_disabled() -> bool {
    *ENV_NO_PROGRESS.get_or_init(|| check_env_bool("TICKLINE_NO_PROGRESS"))
}

// =============================================================================
// Configuration
// =============================================================================

/// Default publish interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

/// Fraction of the interval that must have passed since the last publish
/// before another worker may publish.
pub const DEFAULT_PUBLISH_GATE: f64 = 0.8;

/// Longest line the renderer composes.
pub const DEFAULT_MAX_LINE_LEN: usize = 256;

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub interval: f64,
    pub hold_lock: bool,
    pub publish_gate: f64,
    pub bar_limits: BarLimits,
    pub max_line_len: usize,
}

/// Builder for a [`Session`].
///
/// ```rust
/// use std::time::Duration;
/// use tickline::progress::{Output, SessionBuilder};
///
/// let session = SessionBuilder::new()
///     .output(Output::Stderr)
///     .interval(Duration::from_millis(100))
///     .build();
/// let mut worker = session.init(1_000);
/// assert!(worker.record(1));
/// ```
#[must_use]
pub struct SessionBuilder {
    output: Output,
    interval: Duration,
    hold_lock: bool,
    publish_gate: f64,
    min_bar_len: usize,
    max_bar_len: Option<usize>,
    max_line_len: usize,
    clock: Arc<dyn Clock>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("output", &self.output)
            .field("interval", &self.interval)
            .field("hold_lock", &self.hold_lock)
            .field("publish_gate", &self.publish_gate)
            .field("min_bar_len", &self.min_bar_len)
            .field("max_bar_len", &self.max_bar_len)
            .field("max_line_len", &self.max_line_len)
            .finish_non_exhaustive()
    }
}

impl SessionBuilder {
    /// Creates a builder with default settings: stdout, 200 ms interval, no
    /// lock held across printing.
    pub fn new() -> Self {
        Self {
            output: Output::default(),
            interval: DEFAULT_INTERVAL,
            hold_lock: false,
            publish_gate: DEFAULT_PUBLISH_GATE,
            min_bar_len: BarLimits::default().min,
            max_bar_len: None,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            clock: Arc::new(MonotonicClock::new()),
        }
    }

    /// Sets where status lines are written.
    pub fn output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Sets how often, roughly, [`Worker::record`](super::Worker::record)
    /// returns `true`.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Keeps other workers out of the shared state after a publish until
    /// [`Session::release_lock`] is called. Only needed when printing a
    /// status is slow and its output must not interleave with another
    /// worker's.
    pub fn hold_lock_on_publish(mut self, hold: bool) -> Self {
        self.hold_lock = hold;
        self
    }

    /// Sets the fraction of the interval that must pass between two
    /// publishes (default 0.8).
    pub fn publish_gate(mut self, gate: f64) -> Self {
        self.publish_gate = gate;
        self
    }

    /// Sets the shortest bar drawn (default 10).
    pub fn min_bar_len(mut self, len: usize) -> Self {
        self.min_bar_len = len;
        self
    }

    /// Sets the longest bar drawn (default: the maximum line length).
    pub fn max_bar_len(mut self, len: usize) -> Self {
        self.max_bar_len = Some(len);
        self
    }

    /// Sets the longest line composed, regardless of terminal width
    /// (default 256).
    pub fn max_line_len(mut self, len: usize) -> Self {
        self.max_line_len = len;
        self
    }

    /// Replaces the time source.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Builds the session. Call [`Session::init`] to start tracking.
    pub fn build(self) -> Session {
        let config = Config {
            interval: self.interval.as_secs_f64(),
            hold_lock: self.hold_lock,
            publish_gate: self.publish_gate,
            bar_limits: BarLimits {
                min: self.min_bar_len,
                max: self.max_bar_len.unwrap_or(self.max_line_len),
            },
            max_line_len: self.max_line_len,
        };
        Session::new(config, self.output, self.clock)
    }
}
