//! Shared aggregate state and the session handle.
//!
//! A single mutex guards everything workers share: the aggregate counters,
//! the published [`Snapshot`], the output, and the line bookkeeping of the
//! renderer. Workers only take it on their slow path, so contention is
//! bounded by the publish rate rather than the increment rate.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

use tera::{Context, Tera};

use crate::Result;

use super::clock::Clock;
use super::config::Config;
use super::output::{Output, Target};
use super::render;
use super::snapshot::Snapshot;
use super::worker::Worker;

/// State shared by every worker of a session.
pub(crate) struct Shared {
    /// Bumped by every `init`; workers of older generations are ignored.
    pub generation: u64,
    /// Clock reading at `init`.
    pub start: Duration,
    pub total: u64,
    pub count: u64,
    /// Aggregate count and time (seconds since `init`) of the last publish.
    pub last_count: u64,
    pub last_time: f64,
    /// Rendering width: the terminal width less a margin, capped at the
    /// maximum line length.
    pub width: usize,
    pub printed_lines: usize,
    pub throbber: usize,
    /// Set while a publisher keeps the state to itself (hold-lock mode).
    pub held: bool,
    pub snapshot: Snapshot,
    pub target: Target,
    pub tera: Tera,
}

impl Shared {
    /// Whether the output is a terminal wide enough to draw on.
    pub(crate) fn is_usable(&self) -> bool {
        matches!(self.snapshot.terminal_width, Some(w) if w >= 3)
    }

    fn reset(&mut self, start: Duration) {
        self.generation += 1;
        self.start = start;
        self.total = 0;
        self.count = 0;
        self.last_count = 0;
        self.last_time = 0.0;
        self.width = 0;
        self.printed_lines = 0;
        self.throbber = 0;
        self.held = false;
        self.snapshot = Snapshot::initial();
    }
}

pub(crate) struct Inner {
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    pub state: Mutex<Shared>,
    pub released: Condvar,
}

impl Inner {
    /// Locks the shared state for reading or rendering.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Shared> {
        self.state.lock().unwrap()
    }

    /// Locks the shared state, first waiting for a publisher in hold-lock
    /// mode to call [`Session::release_lock`].
    pub(crate) fn lock_exclusive(&self) -> MutexGuard<'_, Shared> {
        self.released
            .wait_while(self.state.lock().unwrap(), |s| s.held)
            .unwrap()
    }

    /// Seconds since the session was initialized.
    pub(crate) fn elapsed(&self, shared: &Shared) -> f64 {
        self.clock.now().saturating_sub(shared.start).as_secs_f64()
    }
}

/// A progress-tracking session.
///
/// The handle is cheap to clone and can be shared with every worker thread.
/// A session is created by [`SessionBuilder`](super::SessionBuilder),
/// started with [`init`](Self::init), and may be re-initialized any number of
/// times for successive tasks.
#[derive(Clone)]
pub struct Session {
    pub(crate) inner: Arc<Inner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.inner.lock();
        f.debug_struct("Session")
            .field("count", &s.count)
            .field("total", &s.total)
            .field("printed_lines", &s.printed_lines)
            .finish_non_exhaustive()
    }
}

impl Default for Session {
    fn default() -> Self {
        super::SessionBuilder::new().build()
    }
}

impl Session {
    pub(crate) fn new(config: Config, output: Output, clock: Arc<dyn Clock>) -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        let start = clock.now();
        let shared = Shared {
            generation: 0,
            start,
            total: 0,
            count: 0,
            last_count: 0,
            last_time: 0.0,
            width: 0,
            printed_lines: 0,
            throbber: 0,
            held: false,
            snapshot: Snapshot::initial(),
            target: Target::from(output),
            tera,
        };
        Self {
            inner: Arc::new(Inner {
                config,
                clock,
                state: Mutex::new(shared),
                released: Condvar::new(),
            }),
        }
    }

    /// Starts (or restarts) tracking.
    ///
    /// Resets the clock origin and every aggregate counter, then registers
    /// the caller as a worker with `total` units of work. A coordinating
    /// thread that does no work itself passes 0 and hands out workers with
    /// [`init_worker`](Self::init_worker).
    ///
    /// Workers from a previous `init` stop contributing, and a lock held
    /// by a publisher in hold-lock mode is released.
    #[must_use = "the returned worker is needed to record progress"]
    pub fn init(&self, total: u64) -> Worker {
        let mut s = self.inner.lock();
        let start = self.inner.clock.now();
        s.reset(start);
        s.total = total;
        let worker = Worker::new(self.clone(), s.generation, total, 0.0);
        drop(s);
        self.inner.released.notify_all();
        worker
    }

    /// Registers another worker with `total` units of work.
    ///
    /// The worker is meant to be moved into the thread doing the work.
    #[must_use = "the returned worker is needed to record progress"]
    pub fn init_worker(&self, total: u64) -> Worker {
        let mut s = self.inner.lock();
        s.total += total;
        let now = self.inner.elapsed(&s);
        Worker::new(self.clone(), s.generation, total, now)
    }

    /// Returns the status as of the last publish.
    ///
    /// Fresh values are available right after [`Worker::record`] returned
    /// `true`.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot
    }

    /// Sum of the work merged from all workers so far.
    pub fn count(&self) -> u64 {
        self.inner.lock().count
    }

    /// Sum of the totals of all registered workers.
    pub fn total(&self) -> u64 {
        self.inner.lock().total
    }

    /// Composes a status line from a Tera template and prints it.
    ///
    /// Besides the snapshot values (`progress`, `elapsed`, `remaining`,
    /// `rate`, `mean_rate`, `width`), templates can call:
    ///
    /// - `percent()`, `elapsed()`, `remaining()`, `rate()`, `mean_rate()`
    /// - `bar(len=0, fill="#.", text="")` - a progress bar; `len=0` fills the
    ///   width left over by the rest of the line, shared evenly between all
    ///   such bars
    /// - `throbber(anim="|/-\\")` - the next frame of an animation
    ///
    /// Each call prints one line; further calls in the same publish cycle
    /// print below it. Lines wider than the terminal are truncated with
    /// `>>>`. Does nothing unless the output is a usable terminal.
    ///
    /// ```rust
    /// use tickline::progress::{EmulatedTerminal, Output, SessionBuilder};
    ///
    /// let term = EmulatedTerminal::new(40);
    /// let session = SessionBuilder::new().output(Output::Emulated(term.clone())).build();
    /// let mut worker = session.init(4);
    /// if worker.record(1) {
    ///     session.write_status("{{ percent() }} [{{ bar(fill='#.') }}]").unwrap();
    /// }
    /// assert!(term.contents().starts_with("25% [########"));
    /// ```
    pub fn write_status(&self, template: &str) -> Result<()> {
        self.write_status_with(template, &Context::new())
    }

    /// Like [`write_status`](Self::write_status), with extra template
    /// variables.
    pub fn write_status_with(&self, template: &str, ctx: &Context) -> Result<()> {
        let mut s = self.inner.lock();
        if !s.is_usable() {
            return Ok(());
        }
        let line = render::compose(&self.inner.config, &mut s, template, ctx)?;
        render::write_line(&mut s, &line)?;
        Ok(())
    }

    /// Prints a line as is, without template processing.
    ///
    /// The same separation and truncation rules as
    /// [`write_status`](Self::write_status) apply.
    pub fn write_raw(&self, text: &str) -> Result<()> {
        let mut s = self.inner.lock();
        render::write_line(&mut s, text)?;
        Ok(())
    }

    /// Erases every line printed since the last publish.
    ///
    /// Publishing already does this; call it to replace the final status
    /// with a summary line.
    pub fn clear(&self) -> Result<()> {
        let mut s = self.inner.lock();
        render::erase(&mut s)?;
        Ok(())
    }

    /// Lets other workers publish again.
    ///
    /// Only needed with
    /// [`hold_lock_on_publish`](super::SessionBuilder::hold_lock_on_publish):
    /// call it once all lines of a publish have been printed. The thread
    /// holding the lock must not record again before releasing it;
    /// registering workers and re-initializing are fine.
    pub fn release_lock(&self) {
        let mut s = self.inner.lock();
        s.held = false;
        drop(s);
        self.inner.released.notify_all();
    }

    /// Returns the next frame of `anim`, cycling through its characters, or
    /// a blank once all work is done.
    pub fn throbber(&self, anim: &str) -> char {
        let mut s = self.inner.lock();
        let frame = render::throbber_frame(anim, s.throbber, s.count == s.total);
        s.throbber += 1;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{ManualClock, SessionBuilder};

    fn session() -> (Session, ManualClock) {
        let clock = ManualClock::new();
        let session = SessionBuilder::new()
            .output(Output::Writer(Box::new(std::io::sink())))
            .clock(clock.clone())
            .build();
        (session, clock)
    }

    #[test]
    fn test_init_registers_total() {
        let (session, _) = session();
        let _main = session.init(10);
        let _w1 = session.init_worker(5);
        let _w2 = session.init_worker(7);
        assert_eq!(session.total(), 22);
        assert_eq!(session.count(), 0);
    }

    #[test]
    fn test_reinit_resets_everything() {
        let (session, clock) = session();
        let mut main = session.init(2);
        clock.advance_secs(1.0);
        assert!(main.record(2));
        assert_eq!(session.count(), 2);
        assert_eq!(session.snapshot().progress, 1.0);

        let _main = session.init(8);
        assert_eq!(session.count(), 0);
        assert_eq!(session.total(), 8);
        let snap = session.snapshot();
        assert_eq!(snap.progress, 0.0);
        assert!(snap.mean_rate.is_nan());
        assert_eq!(snap.terminal_width, None);
    }

    #[test]
    fn test_init_while_holding_lock() {
        let clock = ManualClock::new();
        let session = SessionBuilder::new()
            .output(Output::Writer(Box::new(std::io::sink())))
            .clock(clock.clone())
            .hold_lock_on_publish(true)
            .build();
        let mut main = session.init(10);
        clock.advance_secs(0.5);
        assert!(main.record(1));
        assert!(session.inner.lock().held);

        let _extra = session.init_worker(5);
        assert_eq!(session.total(), 15);
        assert!(session.inner.lock().held);

        let mut main = session.init(4);
        assert!(!session.inner.lock().held);
        clock.advance_secs(0.5);
        assert!(main.record(1));
        session.release_lock();
    }

    #[test]
    fn test_throbber_cycles() {
        let (session, _) = session();
        let _main = session.init(10);
        let frames: String = (0..6).map(|_| session.throbber("|/-\\")).collect();
        assert_eq!(frames, "|/-\\|/");
    }

    #[test]
    fn test_throbber_blank_when_done() {
        let (session, clock) = session();
        let mut main = session.init(1);
        clock.advance_secs(0.01);
        assert!(main.record(1));
        assert_eq!(session.throbber("|/-\\"), ' ');
    }

    #[test]
    fn test_rendering_is_noop_without_terminal() {
        let (session, _) = session();
        let mut main = session.init(1);
        assert!(main.record(1));
        session.write_raw("hello").unwrap();
        // Template errors are not even reached
        session.write_status("{{ undefined_function() }}").unwrap();
        session.clear().unwrap();
        assert_eq!(session.inner.lock().printed_lines, 0);
    }

    #[test]
    fn test_session_debug() {
        let (session, _) = session();
        let _main = session.init(3);
        let debug_str = format!("{:?}", session);
        assert!(debug_str.contains("Session"));
        assert!(debug_str.contains("total: 3"));
    }
}
