//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The top-level error type for `pd-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed timestamp {0:?}: expected YYYY-MM-DD HH:MM:SS")]
    MalformedTimestamp(String),

    #[error("malformed time of day {0:?}")]
    MalformedTimeOfDay(String),

    #[error("driving {distance} from {departure} runs past the end of the calendar")]
    ClockOverflow { departure: chrono::NaiveDateTime, distance: f64 },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `pd-core`.
pub type CoreResult<T> = Result<T, CoreError>;
