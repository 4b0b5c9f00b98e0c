//! Error types for the tickline library.
//!
//! This module provides the [`Error`] enum and [`Result`] type alias used
//! throughout the library for error handling.

use thiserror::Error;

/// Error type for tickline operations.
///
/// Nothing on the counting path can fail; errors only come out of the
/// rendering side (writing to the output, rendering a status template) and
/// from invalid bar specifications.
#[derive(Error, Debug)]
pub enum Error {
    /// An I/O error occurred (e.g., writing to terminal).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A template rendering error occurred.
    ///
    /// This happens when a status template passed to
    /// [`Session::write_status`](crate::progress::Session::write_status) has
    /// invalid syntax or references undefined variables.
    #[error(transparent)]
    Tera(#[from] tera::Error),

    /// A bar fill string did not contain one or two characters.
    #[error("bar fill must be 1 or 2 characters, got {0:?}")]
    InvalidFill(String),
}

/// A specialized `Result` type for tickline operations.
///
/// This is defined as `std::result::Result<T, tickline::Error>` for convenience.
pub type Result<T> = std::result::Result<T, Error>;
