//! The escape-sequence vocabulary used by the status renderer.
//!
//! Status lines only ever need a handful of CSI sequences: clearing the
//! current line, moving the cursor up, moving it to a column, and switching
//! reverse video on and off. Styles are built with `console` and forced on,
//! because the renderer already refuses to draw on anything that is not a
//! terminal and may be drawing on an emulated one.
//!
//! # Examples
//!
//! ```rust
//! use tickline::style::{reverse, RESET};
//!
//! let s = reverse("50%").to_string();
//! assert_eq!(s, "\x1b[7m50%\x1b[0m");
//! assert!(s.ends_with(RESET));
//! ```

use console::{StyledObject, style};

/// Resets all text attributes.
pub const RESET: &str = "\x1b[0m";

/// Clears from the cursor to the end of the line.
pub const CLEAR_LINE: &str = "\x1b[K";

/// Moves the cursor up one row.
pub const CURSOR_UP: &str = "\x1b[A";

/// Carriage return followed by a line clear.
pub const ERASE_CURRENT_LINE: &str = "\r\x1b[K";

/// Cursor up followed by a line clear.
pub const ERASE_LINE_ABOVE: &str = "\x1b[A\x1b[K";

/// Returns the sequence moving the cursor to the 1-based `column`.
pub fn cursor_to_column(column: usize) -> String {
    format!("\x1b[{column}G")
}

/// Styles the value for a status line, whatever the output is.
pub fn sstyle<D>(val: D) -> StyledObject<D> {
    style(val).force_styling(true)
}

/// Shows the value in reverse video.
pub fn reverse<D>(val: D) -> StyledObject<D> {
    sstyle(val).reverse()
}
