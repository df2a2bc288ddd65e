//! # Command Handlers
//!
//! One handler per slash command (`/ping`, `/download`, `/ranked`, ...).
//! Handlers are invoked by the Router and must return quickly: argument checks
//! happen inline, anything slow goes into a deferred task.

use std::fmt;

pub mod birthday;
pub mod download;
pub mod league;
pub mod misc;

/// Argument problem caught before any work is scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Missing(&'static str),
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "missing option '{field}'"),
            Self::OutOfRange { field, value, min, max } => {
                write!(f, "{field} {value} is outside {min}..={max}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Reads an integer option and checks it against an inclusive range.
pub(crate) fn bounded(
    value: Option<i64>,
    field: &'static str,
    min: i64,
    max: i64,
) -> Result<i64, ValidationError> {
    let value = value.ok_or(ValidationError::Missing(field))?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange { field, value, min, max })
    }
}
