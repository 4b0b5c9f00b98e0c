//! Escape-aware text measurement and truncation.
//!
//! Status lines routinely embed CSI sequences (colors, reverse video). These
//! take no room on screen, so every width computation here skips them. Only
//! the minimal CSI grammar is recognized:
//!
//! ```text
//! ESC '[' <parameter bytes 0x30-0x3F>* <intermediate bytes 0x20-0x2F>* <final byte 0x40-0x7E>
//! ```
//!
//! A bare `ESC` not followed by `[` is consumed on its own.

use std::borrow::Cow;

use unicode_width::UnicodeWidthChar;

use crate::style::RESET;

const ESC: u8 = 0x1b;

/// Appended to lines cut short by [`truncate`].
pub const TRUNCATION_MARKER: &str = ">>>";

/// Returns the byte offset of the first character at or after `pos` that is
/// not part of an escape sequence (or `s.len()` if there is none).
///
/// `pos` must lie on a char boundary; the returned offset always does.
pub fn skip_escapes(s: &str, pos: usize) -> usize {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut p = pos;
    while p < len && bytes[p] == ESC {
        p += 1;
        if p < len && bytes[p] == b'[' {
            p += 1;
            while p < len && (0x30..=0x3f).contains(&bytes[p]) {
                p += 1;
            }
            while p < len && (0x20..=0x2f).contains(&bytes[p]) {
                p += 1;
            }
            if p < len && (0x40..=0x7e).contains(&bytes[p]) {
                p += 1;
            }
        }
    }
    p
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Number of terminal columns `s` occupies, ignoring escape sequences.
///
/// For ASCII text this is the number of characters outside escape sequences.
pub fn printable_width(s: &str) -> usize {
    let mut p = 0;
    let mut n = 0;
    loop {
        p = skip_escapes(s, p);
        let Some(c) = s[p..].chars().next() else {
            return n;
        };
        n += char_width(c);
        p += c.len_utf8();
    }
}

/// Returns the largest byte offset into `s` whose prefix occupies at most
/// `width` columns.
///
/// Escape sequences directly following the last fitting character are part of
/// the prefix, so a style switched on right before the cut still applies:
///
/// ```rust
/// use tickline::text::raw_len_for;
///
/// assert_eq!(raw_len_for("abc\x1b[7mfgh", 4), 8);
/// assert_eq!(raw_len_for("abc\x1b[7mfgh", 3), 7);
/// ```
pub fn raw_len_for(s: &str, width: usize) -> usize {
    let mut p = 0;
    let mut n = 0;
    loop {
        p = skip_escapes(s, p);
        let Some(c) = s[p..].chars().next() else {
            return p;
        };
        let w = char_width(c);
        if n + w > width {
            return p;
        }
        n += w;
        p += c.len_utf8();
    }
}

/// Fits `s` into `width` columns.
///
/// Text that already fits is returned untouched. Otherwise the longest prefix
/// of `width - 3` columns is kept and followed by [`TRUNCATION_MARKER`] and a
/// formatting reset, so a style cut in half cannot bleed past the line.
pub fn truncate(s: &str, width: usize) -> Cow<'_, str> {
    if printable_width(s) <= width {
        return Cow::Borrowed(s);
    }
    let keep = raw_len_for(s, width.saturating_sub(TRUNCATION_MARKER.len()));
    Cow::Owned(format!("{}{TRUNCATION_MARKER}{RESET}", &s[..keep]))
}
