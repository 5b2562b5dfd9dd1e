//! Connectivity-layer abstraction trait.
//!
//! This module defines the `DriverConnection` trait that abstracts the
//! physical database connection and its native statement primitives. The
//! execution core orchestrates these primitives but never implements them;
//! connection pooling, wire protocol and per-call timeout enforcement all
//! live behind this seam.

use crate::error::DriverError;
use async_trait::async_trait;
use std::time::Duration;

use super::rows::{ColumnInfo, RowPage};

/// Opaque token for one native statement resource.
///
/// Issued by `DriverConnection::prepare_statement` and passed back into
/// every subsequent statement primitive. The token is only meaningful to
/// the connection that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatementHandle(i64);

impl StatementHandle {
    /// Create a handle from a raw driver identifier.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the raw driver identifier.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// Opaque token for one open server-side retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorHandle(i64);

impl CursorHandle {
    /// Create a handle from a raw driver identifier.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the raw driver identifier.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// Response to a retrieval execution.
///
/// Carries the column header, the first page of rows and, when the driver
/// kept the retrieval open for incremental fetching, a cursor handle.
/// `cursor` is `None` when `first_page` already holds the whole result.
#[derive(Debug, Clone)]
pub struct QueryResponse {
    /// Result column descriptions, in result order
    pub columns: Vec<ColumnInfo>,
    /// First page of raw rows
    pub first_page: RowPage,
    /// Handle for fetching further pages, if any remain
    pub cursor: Option<CursorHandle>,
}

impl QueryResponse {
    /// Create a fully-materialized response with no open cursor.
    pub fn complete(columns: Vec<ColumnInfo>, rows: Vec<Vec<serde_json::Value>>) -> Self {
        Self {
            columns,
            first_page: RowPage::new(rows, true),
            cursor: None,
        }
    }

    /// Create a response whose remaining pages are fetched through `cursor`.
    pub fn streaming(columns: Vec<ColumnInfo>, first_page: RowPage, cursor: CursorHandle) -> Self {
        Self {
            columns,
            first_page,
            cursor: Some(cursor),
        }
    }
}

/// Native connection primitives consumed by the execution core.
///
/// One connection is the unit of serialization: the core shares it behind
/// an async mutex and drives one primitive at a time. Implementations
/// cover the wire protocol of a concrete database; the core stays
/// driver-agnostic.
#[async_trait]
pub trait DriverConnection: Send + Sync {
    /// Check whether the connection is still usable.
    fn is_open(&self) -> bool;

    /// Allocate a native statement resource for the given SQL.
    ///
    /// The transaction timeout is advisory; drivers that do not support
    /// it ignore it silently.
    ///
    /// # Errors
    ///
    /// Returns `DriverError` if the connection is closed or the SQL is
    /// rejected.
    async fn prepare_statement(
        &mut self,
        sql: &str,
        transaction_timeout: Option<Duration>,
    ) -> Result<StatementHandle, DriverError>;

    /// Write one converted value to a positional slot of a statement.
    async fn bind_parameter(
        &mut self,
        statement: StatementHandle,
        position: usize,
        value: serde_json::Value,
    ) -> Result<(), DriverError>;

    /// Append the currently-bound parameter set to the statement's batch.
    async fn add_batch(&mut self, statement: StatementHandle) -> Result<(), DriverError>;

    /// Execute the statement as a single mutation.
    ///
    /// # Returns
    ///
    /// The number of rows affected.
    async fn execute_update(&mut self, statement: StatementHandle) -> Result<u64, DriverError>;

    /// Execute the statement's accumulated batch.
    ///
    /// # Returns
    ///
    /// Per-row affected counts, in append order.
    async fn execute_batch(&mut self, statement: StatementHandle) -> Result<Vec<u64>, DriverError>;

    /// Execute the statement as a retrieval.
    async fn execute_query(
        &mut self,
        statement: StatementHandle,
    ) -> Result<QueryResponse, DriverError>;

    /// Fetch the next page of an open retrieval.
    async fn fetch_rows(&mut self, cursor: CursorHandle) -> Result<RowPage, DriverError>;

    /// Release an open retrieval.
    async fn close_cursor(&mut self, cursor: CursorHandle) -> Result<(), DriverError>;

    /// Read back an output parameter after execution.
    async fn read_output_parameter(
        &mut self,
        statement: StatementHandle,
        position: usize,
    ) -> Result<serde_json::Value, DriverError>;

    /// Release a native statement resource.
    async fn close_statement(&mut self, statement: StatementHandle) -> Result<(), DriverError>;
}
