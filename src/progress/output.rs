//! Output destinations for status lines.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use console::Term;

/// Where status lines are written.
///
/// Only a terminal of usable width is ever drawn on; with any other
/// destination the rendering operations do nothing while the counting and
/// the snapshot keep working.
#[derive(Default)]
pub enum Output {
    /// Standard output (default).
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
    /// An arbitrary writer. Never considered a terminal, so nothing is
    /// written to it.
    Writer(Box<dyn Write + Send>),
    /// An in-memory terminal of fixed width. Everything the renderer emits,
    /// escape sequences included, is captured for inspection.
    Emulated(EmulatedTerminal),
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("Stdout"),
            Self::Stderr => f.write_str("Stderr"),
            Self::Writer(_) => f.write_str("Writer(..)"),
            Self::Emulated(term) => f.debug_tuple("Emulated").field(term).finish(),
        }
    }
}

/// A fixed-width terminal that records its output.
///
/// Clones share the same buffer.
///
/// ```rust
/// use tickline::progress::EmulatedTerminal;
///
/// let term = EmulatedTerminal::new(80);
/// assert_eq!(term.width(), 80);
/// assert_eq!(term.contents(), "");
/// ```
#[derive(Debug, Clone)]
pub struct EmulatedTerminal {
    width: usize,
    buf: Arc<Mutex<Vec<u8>>>,
}

impl EmulatedTerminal {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            buf: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the terminal width in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    /// Returns everything written so far and empties the buffer.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.buf.lock().unwrap());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// The resolved destination a session renders to.
pub(crate) enum Target {
    Term(Term),
    Writer(Box<dyn Write + Send>),
    Emulated(EmulatedTerminal),
}

impl From<Output> for Target {
    fn from(output: Output) -> Self {
        match output {
            Output::Stdout => Self::Term(Term::buffered_stdout()),
            Output::Stderr => Self::Term(Term::buffered_stderr()),
            Output::Writer(w) => Self::Writer(w),
            Output::Emulated(term) => Self::Emulated(term),
        }
    }
}

impl Target {
    /// Width in columns, or `None` if the destination is not a terminal.
    pub(crate) fn width(&self) -> Option<usize> {
        match self {
            Self::Term(term) if term.is_term() => {
                term.size_checked().map(|(_rows, cols)| cols as usize)
            }
            Self::Term(_) | Self::Writer(_) => None,
            Self::Emulated(term) => Some(term.width),
        }
    }

    pub(crate) fn write_str(&mut self, s: &str) -> io::Result<()> {
        match self {
            Self::Term(term) => term.write_str(s),
            Self::Writer(w) => w.write_all(s.as_bytes()),
            Self::Emulated(term) => {
                term.buf.lock().unwrap().extend_from_slice(s.as_bytes());
                Ok(())
            }
        }
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Term(term) => term.flush(),
            Self::Writer(w) => w.flush(),
            Self::Emulated(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emulated_terminal_records_output() {
        let term = EmulatedTerminal::new(40);
        let mut target = Target::from(Output::Emulated(term.clone()));
        assert_eq!(target.width(), Some(40));
        target.write_str("hello ").unwrap();
        target.write_str("\x1b[Kworld").unwrap();
        target.flush().unwrap();
        assert_eq!(term.contents(), "hello \x1b[Kworld");
        assert_eq!(term.take(), "hello \x1b[Kworld");
        assert_eq!(term.contents(), "");
    }

    #[test]
    fn test_writer_is_not_a_terminal() {
        let target = Target::from(Output::Writer(Box::new(Vec::<u8>::new())));
        assert_eq!(target.width(), None);
    }

    #[test]
    fn test_output_debug() {
        assert_eq!(format!("{:?}", Output::default()), "Stdout");
        assert_eq!(format!("{:?}", Output::Writer(Box::new(io::sink()))), "Writer(..)");
    }
}
