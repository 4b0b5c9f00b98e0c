//! Low-overhead progress reporting for long, multi-threaded computations.
//!
//! See [`progress`] for the session engine, [`progress_bar`] for bar layout
//! and [`text`] for escape-aware measurement of status lines.

pub use error::{Error, Result};

mod error;
pub mod progress;
pub mod progress_bar;
pub mod style;
pub mod text;
