//! Error types raised by the pure domain layer.

use thiserror::Error;

/// Failure to read a calendar date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Input is not a `YYYY-MM-DD` calendar date.
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Input rejected before any write happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,

    /// Owner is empty after trimming.
    #[error("owner must not be empty")]
    EmptyOwner,

    /// Due date was not supplied.
    #[error("due date must not be empty")]
    EmptyDueDate,

    /// Throw offset is not one of the supported day counts.
    #[error("unsupported throw offset {0}; expected one of 1, 2, 7, 30, 90, 365")]
    UnsupportedOffset(i64),

    /// Throw action is neither a keyword nor a day count.
    #[error(
        "unknown throw action '{0}'; expected a day count or one of complete, remove, swipe"
    )]
    UnknownThrowAction(String),
}
