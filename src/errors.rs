//! Error types for loading puzzles and rendering solutions.
//!
//! Each variant has a stable code for documentation lookup:
//!
//! - E001: `Io` (a structure or word-list file couldn't be read)
//! - E002: `EmptyStructure` (the structure file has no rows)
//! - E003: `Image` (the solved grid couldn't be written as an image)
//!
//! Failing to find a fill is not an error; see [`crate::fill::FillFailure`].

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Couldn't read \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Structure file contains no rows")]
    EmptyStructure,

    #[error("Couldn't write image: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io { .. } => "E001",
            Error::EmptyStructure => "E002",
            Error::Image(_) => "E003",
        }
    }

    /// Returns a helpful suggestion for this error, if there is one
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            Error::EmptyStructure => Some("Mark fillable cells with '_' and blocked cells with any other character, one row per line"),
            Error::Image(_) => Some("Use an output path ending in .png"),
            Error::Io { .. } => None,
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        match self.help() {
            Some(help_text) => format!("{self} ({})\n{help_text}", self.code()),
            None => format!("{self} ({})", self.code()),
        }
    }
}
