//! Error types for sqlexec.
//!
//! This module defines domain-specific error types organized by functional area.

use thiserror::Error;

/// Top-level error type encompassing all possible errors.
#[derive(Error, Debug)]
pub enum StatementError {
    /// Bound-statement shape errors
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Statement preparation errors
    #[error(transparent)]
    Prepare(#[from] PrepareError),

    /// Parameter binding errors
    #[error(transparent)]
    Bind(#[from] BindError),

    /// Statement execution errors
    #[error(transparent)]
    Execute(#[from] ExecuteError),

    /// Cursor errors
    #[error(transparent)]
    Cursor(#[from] CursorError),
}

/// Errors raised while validating a bound statement's shape.
#[derive(Error, Debug)]
pub enum MappingError {
    /// Placeholder count does not match the descriptor count
    #[error("SQL has {placeholders} placeholders but {descriptors} parameter descriptors")]
    PlaceholderMismatch {
        placeholders: usize,
        descriptors: usize,
    },

    /// Descriptor positions are not a contiguous, duplicate-free range
    #[error("invalid parameter positions: {detail}")]
    InvalidPositions { detail: String },

    /// The chosen statement variant takes no parameters
    #[error("{kind} statements do not accept parameter descriptors")]
    ParametersNotSupported { kind: String },
}

/// Errors raised while allocating a native statement handle.
#[derive(Error, Debug)]
pub enum PrepareError {
    /// The connection was closed before or during preparation
    #[error("connection is closed")]
    ConnectionClosed,

    /// The driver rejected the statement text
    #[error("driver rejected statement `{sql}`: {message}")]
    Rejected { sql: String, message: String },

    /// The handler was already prepared once
    #[error("statement handler is already prepared")]
    AlreadyPrepared,
}

/// Errors raised while applying parameter values to a native statement.
#[derive(Error, Debug)]
pub enum BindError {
    /// The semantic type has no conversion path for the given value
    #[error("cannot convert parameter {position} (`{property}`) to {semantic}: {message}")]
    TypeConversion {
        position: usize,
        property: String,
        semantic: String,
        message: String,
    },

    /// A required non-nullable parameter has no value
    #[error("missing value for required parameter {position} (`{property}`)")]
    MissingParameter { position: usize, property: String },

    /// The parameter position does not exist on the statement
    #[error("parameter position {position} out of range for statement with {count} parameters")]
    PositionOutOfRange { position: usize, count: usize },

    /// The driver failed to accept the bound value
    #[error("driver failed to bind parameter {position}: {message}")]
    Driver { position: usize, message: String },
}

/// Errors raised while executing a prepared statement.
#[derive(Error, Debug)]
pub enum ExecuteError {
    /// The driver rejected or failed the execute step
    #[error("driver execution failed: {message}")]
    Driver { message: String },

    /// The operation is not valid for the chosen statement variant
    #[error("operation `{operation}` is not supported by {kind} statement handlers")]
    UnsupportedOperation {
        operation: &'static str,
        kind: String,
    },

    /// The operation is not valid in the handler's current state
    #[error("operation `{operation}` is invalid in the {state} state: {detail}")]
    InvalidState {
        operation: &'static str,
        state: String,
        detail: String,
    },
}

/// Errors raised while advancing or releasing a row cursor.
#[derive(Error, Debug)]
pub enum CursorError {
    /// The cursor was advanced after being closed
    #[error("cursor has been closed")]
    Closed,

    /// The driver failed a fetch or release call
    #[error("cursor driver call failed: {message}")]
    Driver { message: String },
}

/// Errors surfaced by the connectivity layer.
///
/// These originate below the `DriverConnection` seam; the execution core
/// never constructs them, only maps them into its own taxonomy with the
/// driver diagnostic carried verbatim.
#[derive(Error, Debug, Clone)]
pub enum DriverError {
    /// The connection is no longer usable
    #[error("connection is closed")]
    ConnectionClosed,

    /// The statement text was rejected
    #[error("invalid SQL: {message}")]
    InvalidSql { message: String },

    /// The execute step failed on the server
    #[error("execution failed: {message}")]
    Execution { message: String },

    /// Network or protocol failure
    #[error("I/O failure: {message}")]
    Io { message: String },
}
