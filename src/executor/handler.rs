//! The statement handler contract.
//!
//! A statement handler orchestrates one unit of work against one native
//! statement handle: prepare, bind parameters, optionally batch, then
//! exactly one terminal operation (update, batched update, query or
//! cursor query). Three variants satisfy the same contract; the mapping
//! layer picks one purely from the bound statement's shape.

use crate::driver::{DriverConnection, StatementHandle};
use crate::error::StatementError;
use crate::executor::binder::ParameterBinder;
use crate::executor::callable::CallableStatementHandler;
use crate::executor::cursor::RowCursor;
use crate::executor::prepared::PreparedStatementHandler;
use crate::executor::results::{ResultRow, RowConsumer};
use crate::executor::simple::SimpleStatementHandler;
use crate::mapping::{BoundStatement, ParameterSet};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Statement handler variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Plain statement without parameter placeholders
    Simple,
    /// Pre-compiled statement with positional placeholders
    Prepared,
    /// Stored-procedure invocation, possibly with output parameters
    Callable,
}

impl StatementKind {
    /// Select the variant from a bound statement's shape.
    ///
    /// Call syntax wins over placeholder count: a procedure invocation is
    /// Callable even when it carries no parameters.
    pub fn from_bound(bound: &BoundStatement) -> Self {
        if is_call_syntax(bound.sql()) {
            Self::Callable
        } else if bound.parameter_count() > 0 {
            Self::Prepared
        } else {
            Self::Simple
        }
    }

    /// Lowercase variant name, for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Simple => "simple",
            StatementKind::Prepared => "prepared",
            StatementKind::Callable => "callable",
        }
    }

    /// Whether the variant supports batch accumulation.
    pub fn supports_batch(&self) -> bool {
        !matches!(self, StatementKind::Simple)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect stored-procedure call syntax: `{call …}` or a leading CALL.
fn is_call_syntax(sql: &str) -> bool {
    let trimmed = sql.trim_start();
    let body = match trimmed.strip_prefix('{') {
        Some(rest) => rest.trim_start(),
        None => trimmed,
    };
    let mut words = body.splitn(2, |c: char| c.is_whitespace() || c == '(');
    matches!(words.next(), Some(word) if word.eq_ignore_ascii_case("call"))
}

/// How the terminal `update` executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One execution per update call
    Direct,
    /// Accumulate rows with `batch`, execute them together on update
    Batch,
}

/// Contract shared by all statement handler variants.
///
/// Lifecycle: exactly one `prepare`, zero or more `parameterize`/`batch`
/// rounds, then exactly one terminal operation. A handler is driven by a
/// single logical task and must not be reused across bound statements.
#[async_trait]
pub trait StatementHandler: Send {
    /// Allocate the native statement handle from the connection.
    ///
    /// The transaction timeout is forwarded to the driver, which may
    /// silently ignore it.
    ///
    /// # Errors
    ///
    /// Returns `PrepareError::AlreadyPrepared` on a second call, and
    /// `PrepareError::ConnectionClosed` / `Rejected` when the driver
    /// cannot allocate the handle.
    async fn prepare(
        &mut self,
        connection: Arc<Mutex<dyn DriverConnection>>,
        transaction_timeout: Option<Duration>,
    ) -> Result<StatementHandle, StatementError>;

    /// Apply every parameter descriptor, in ascending position order.
    ///
    /// A no-op for variants without parameters.
    async fn parameterize(&mut self, statement: StatementHandle) -> Result<(), StatementError>;

    /// Append the currently-bound parameter set to the pending batch.
    ///
    /// # Errors
    ///
    /// Returns `ExecuteError::UnsupportedOperation` on variants without
    /// batch support, and `ExecuteError::InvalidState` outside Batch mode.
    async fn batch(&mut self, statement: StatementHandle) -> Result<(), StatementError>;

    /// Execute as a mutation.
    ///
    /// # Returns
    ///
    /// The affected-row count; for a batch, the sum over appended rows.
    async fn update(&mut self, statement: StatementHandle) -> Result<u64, StatementError>;

    /// Execute as a retrieval, materializing every row.
    ///
    /// Rows are pushed to `consumer` in source order; retrieval stops
    /// promptly when the consumer signals `Stop`.
    async fn query(
        &mut self,
        statement: StatementHandle,
        consumer: &mut dyn RowConsumer,
    ) -> Result<Vec<ResultRow>, StatementError>;

    /// Execute as a retrieval, returning a lazy forward-only cursor.
    async fn query_cursor(&mut self, statement: StatementHandle)
        -> Result<RowCursor, StatementError>;

    /// Get the bound statement this handler executes.
    fn bound_statement(&self) -> &BoundStatement;

    /// Get the parameter binder.
    fn parameter_binder(&self) -> &ParameterBinder;

    /// Get the parameter binder mutably, to re-bind values for the next
    /// batch row without re-preparing.
    fn parameter_binder_mut(&mut self) -> &mut ParameterBinder;

    /// Get the handler variant.
    fn kind(&self) -> StatementKind;
}

/// Build the handler variant matching a bound statement's shape.
///
/// # Errors
///
/// Returns `MappingError::ParametersNotSupported` when a plain statement
/// arrives with parameter descriptors (which its shape cannot have).
pub fn handler_for(
    bound: Arc<BoundStatement>,
    parameters: ParameterSet,
    mode: ExecutionMode,
) -> Result<Box<dyn StatementHandler>, StatementError> {
    match StatementKind::from_bound(&bound) {
        StatementKind::Simple => Ok(Box::new(SimpleStatementHandler::new(bound, mode)?)),
        StatementKind::Prepared => Ok(Box::new(PreparedStatementHandler::new(
            bound, parameters, mode,
        ))),
        StatementKind::Callable => Ok(Box::new(CallableStatementHandler::new(
            bound, parameters, mode,
        ))),
    }
}
