//! The public status published by a session.

use serde::Serialize;

use super::format;

/// Aggregate status as of the last publish.
///
/// Rates and the remaining time are NaN until enough data has been
/// collected; the formatters show them as "?".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    /// Fraction of the total work done, from 0 to 1.
    pub progress: f64,
    /// Seconds since `init`.
    pub elapsed: f64,
    /// Estimated seconds left, from the instantaneous rate.
    pub remaining: f64,
    /// Work units per second over the last publish interval.
    pub instant_rate: f64,
    /// Work units per second since `init`.
    pub mean_rate: f64,
    /// Terminal width in columns, `None` if the output is not a terminal.
    pub terminal_width: Option<usize>,
}

impl Snapshot {
    pub(crate) fn initial() -> Self {
        Self {
            progress: 0.0,
            elapsed: 0.0,
            remaining: f64::NAN,
            instant_rate: f64::NAN,
            mean_rate: f64::NAN,
            terminal_width: None,
        }
    }

    /// Progress as a whole percentage, e.g. "42%".
    pub fn percent(&self) -> String {
        format::percent(self.progress)
    }

    /// Elapsed time, e.g. "1m05s".
    pub fn elapsed_text(&self) -> String {
        format::interval(self.elapsed)
    }

    /// Remaining time, e.g. "3h12m".
    pub fn remaining_text(&self) -> String {
        format::interval(self.remaining)
    }

    /// Instantaneous rate, e.g. "1.50K".
    pub fn rate_text(&self) -> String {
        format::rate(self.instant_rate)
    }

    /// Mean rate, e.g. "980".
    pub fn mean_rate_text(&self) -> String {
        format::rate(self.mean_rate)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_snapshot_is_unknown() {
        let snap = Snapshot::initial();
        assert_eq!(snap.percent(), "0%");
        assert_eq!(snap.elapsed_text(), "0s");
        assert_eq!(snap.remaining_text(), "?");
        assert_eq!(snap.rate_text(), "?");
        assert_eq!(snap.mean_rate_text(), "?");
        assert_eq!(snap.terminal_width, None);
    }

    #[test]
    fn test_serialize_non_finite_as_null() {
        let json = serde_json::to_value(Snapshot::initial()).unwrap();
        assert_eq!(json["progress"], 0.0);
        assert!(json["remaining"].is_null());
        assert!(json["terminal_width"].is_null());
    }
}
