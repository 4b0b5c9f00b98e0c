//! Formatting of percentages, time intervals, and rates.
//!
//! Every formatter returns an owned `String`, so results can be held across
//! publishes and produced from any thread.

/// Shown for values that cannot be estimated (NaN, infinite, negative).
pub const UNKNOWN: &str = "?";

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK_SECS: f64 = (7 * DAY) as f64;

const SI_PREFIXES: [(f64, &str); 10] = [
    (1e3, "K"),
    (1e6, "M"),
    (1e9, "G"),
    (1e12, "T"),
    (1e15, "P"),
    (1e18, "E"),
    (1e21, "Z"),
    (1e24, "Y"),
    (1e27, "R"),
    (1e30, "Q"),
];

/// Formats a progress fraction as a whole percentage: `0.423` -> `"42%"`.
pub fn percent(progress: f64) -> String {
    format!("{:.0}%", (100.0 * progress).round())
}

/// Formats a number of seconds as a compact interval.
///
/// - Under a minute: "42s"
/// - Under an hour: "1m01s"
/// - Under a day: "1h01m"
/// - Up to a week: "2d03h"
/// - Beyond a week: seconds in scientific notation, "7.00E+05s"
/// - NaN, infinite or negative: "?"
pub fn interval(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return UNKNOWN.to_string();
    }
    if secs > WEEK_SECS {
        return format!("{}s", scientific(secs, 2, false));
    }
    let n = secs as u64;
    if n < MINUTE {
        format!("{n}s")
    } else if n < HOUR {
        format!("{}m{:02}s", n / MINUTE, n % MINUTE)
    } else if n < DAY {
        format!("{}h{:02}m", n / HOUR, (n % HOUR) / MINUTE)
    } else {
        format!("{}d{:02}h", n / DAY, (n % DAY) / HOUR)
    }
}

/// Formats a work rate (units per second) to three significant digits with
/// an SI prefix: `999.0` -> `"999"`, `1500.0` -> `"1.50K"`, `2.5e7` ->
/// `"25.0M"`. Rates beyond the largest prefix use two significant digits in
/// scientific notation; NaN, infinite or negative rates give "?".
pub fn rate(x: f64) -> String {
    if !x.is_finite() || x < 0.0 {
        return UNKNOWN.to_string();
    }
    // Round first so a value like 999.6 moves up to the next prefix instead
    // of printing as "1000".
    let x = round_significant(x, 3);
    if x < 1000.0 {
        return format!("{:.*}", three_digits(x), x);
    }
    for pair in SI_PREFIXES.windows(2) {
        let (scale, prefix) = pair[0];
        if x < pair[1].0 {
            let x = x / scale;
            return format!("{:.*}{prefix}", three_digits(x), x);
        }
    }
    let (scale, prefix) = SI_PREFIXES[SI_PREFIXES.len() - 1];
    if x < scale * 1e3 {
        let x = x / scale;
        return format!("{:.*}{prefix}", three_digits(x), x);
    }
    scientific(x, 1, true)
}

/// Rounds `x` to `digits` significant digits.
fn round_significant(x: f64, digits: i32) -> f64 {
    if x == 0.0 {
        return x;
    }
    let shift = digits - 1 - x.log10().floor() as i32;
    if shift >= 0 {
        let p = 10f64.powi(shift);
        (x * p).round() / p
    } else {
        let p = 10f64.powi(-shift);
        (x / p).round() * p
    }
}

/// Decimal places needed to show three significant digits of `x` in
/// `[1, 1000)`.
fn three_digits(x: f64) -> usize {
    if x < 10.0 {
        2
    } else if x < 100.0 {
        1
    } else {
        0
    }
}

/// Scientific notation with a signed, two-digit exponent: `7.00E+05`.
/// With `trim`, trailing zeros of the mantissa are dropped: `1E+34`.
fn scientific(x: f64, decimals: usize, trim: bool) -> String {
    let s = format!("{x:.decimals$E}");
    let (mantissa, exp) = s.split_once('E').unwrap_or((s.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let mantissa = if trim && mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}E{sign}{:02}", exp.abs())
}
