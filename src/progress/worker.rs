//! Per-worker counters and the adaptive sampling that throttles publishes.
//!
//! Each worker counts on its own, without synchronization, and only compares
//! its count against a *mark*: the count at which about one publish interval
//! will have passed, extrapolated from the worker's recent rate. Crossing the
//! mark takes the slow path, which merges the worker's progress into the
//! session under the lock and publishes a new snapshot if enough time has
//! passed since the last one, or if this is the first or the final piece of
//! work.

use super::diagnostics;
use super::render;
use super::session::Session;

/// A worker's progress counter.
///
/// Created by [`Session::init`] or [`Session::init_worker`] and owned by the
/// thread doing the work. On drop, any progress not yet merged into the
/// session is merged.
pub struct Worker {
    session: Session,
    generation: u64,
    total: u64,
    count: u64,
    last_count: u64,
    /// Seconds since `init` at the last sync.
    last_time: f64,
    mark: u64,
}

impl Worker {
    pub(crate) fn new(session: Session, generation: u64, total: u64, now: f64) -> Self {
        Self {
            session,
            generation,
            total,
            count: 0,
            last_count: 0,
            last_time: now,
            // Publish on the first record.
            mark: 0,
        }
    }

    /// Records `inc` units of work.
    ///
    /// Returns `true` when a new snapshot was published; the caller should
    /// then print its status lines. This is cheap enough to call for every
    /// unit of work: unless the mark is reached it is a single add and
    /// compare.
    ///
    /// ```rust
    /// use tickline::progress::Session;
    ///
    /// let session = Session::default();
    /// let mut worker = session.init(1_000_000);
    /// for _ in 0..1_000_000 {
    ///     if worker.record(1) {
    ///         let _ = session.write_status("{{ percent() }} [{{ bar() }}] {{ remaining() }}");
    ///     }
    /// }
    /// assert_eq!(session.snapshot().progress, 1.0);
    /// ```
    #[inline]
    pub fn record(&mut self, inc: u64) -> bool {
        self.count += inc;
        self.count >= self.mark && self.publish()
    }

    /// Work recorded by this worker.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Work assigned to this worker.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The count at which this worker next syncs with the session.
    pub fn mark(&self) -> u64 {
        self.mark
    }

    /// Returns the session this worker reports to.
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[cold]
    #[inline(never)]
    fn publish(&mut self) -> bool {
        let inner = &*self.session.inner;
        let config = &inner.config;
        let mut guard = inner.lock_exclusive();
        let s = &mut *guard;
        if s.generation != self.generation {
            // Stale after a re-init: keep off the slow path for good.
            self.mark = u64::MAX;
            return false;
        }

        let now = inner.elapsed(s);
        let prev = self.last_count;
        let delta = self.count - prev;
        let first_sync = prev == 0;

        // Extrapolate how much work this worker does in one interval. With no
        // measurable time since the last sync the old mark is kept.
        let dt = now - self.last_time;
        if dt > 0.0 {
            let ahead = config.interval * delta as f64 / dt;
            self.mark = self.mark.saturating_add(ahead as u64);
        }
        // The total is always a mark, so 100% is always published.
        if self.count < self.total && self.mark > self.total {
            self.mark = self.total;
        }
        self.last_count = self.count;
        self.last_time = now;

        s.count += delta;
        let global_dt = now - s.last_time;

        // Marks are estimates and every worker races for the terminal: only
        // publish if enough time passed since the last publish, or on a
        // worker's first and last pieces of work.
        let ready = global_dt > config.publish_gate * config.interval;
        let first = first_sync || s.count == delta;
        // Increments need not divide the total, so completion is the sync
        // that reaches or steps over it.
        let finished =
            self.count == self.total || (prev < self.total && self.count > self.total);
        if !(ready || first || finished) {
            return false;
        }

        let snap = &mut s.snapshot;
        snap.progress = if s.total == 0 {
            1.0
        } else {
            s.count as f64 / s.total as f64
        };
        snap.elapsed = now;
        snap.mean_rate = s.count as f64 / now;
        // Short intervals give noisy rates; keep the last good one.
        if ready {
            snap.instant_rate = (s.count - s.last_count) as f64 / global_dt;
        }
        snap.remaining = s.total.saturating_sub(s.count) as f64 / snap.instant_rate;

        let terminal_width = if super::config::is_disabled() {
            None
        } else {
            s.target.width()
        };
        s.snapshot.terminal_width = terminal_width;
        s.width = match terminal_width {
            Some(w) if w >= config.max_line_len + 2 => config.max_line_len,
            Some(w) => w.saturating_sub(2),
            None => 0,
        };

        s.last_count = s.count;
        s.last_time = now;

        if render::erase(s).is_err() {
            s.printed_lines = 0;
        }
        diagnostics::log_publish(s.count, s.total, &s.snapshot);

        if config.hold_lock {
            s.held = true;
        }
        true
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let delta = self.count - self.last_count;
        if delta == 0 {
            return;
        }
        // A plain lock: the dropping thread may be the one holding the state
        // in hold-lock mode.
        let mut s = self.session.inner.lock();
        if s.generation == self.generation {
            s.count += delta;
        }
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("total", &self.total)
            .field("count", &self.count)
            .field("mark", &self.mark)
            .finish_non_exhaustive()
    }
}
