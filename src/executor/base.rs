//! Shared handler plumbing.
//!
//! `HandlerCore` carries everything the three variants have in common:
//! the lifecycle state machine, exactly-once preparation, batch
//! bookkeeping, the query push loop and failure-path resource release.
//! Variants wrap it and diverge only where their contract diverges.

use crate::driver::{CursorHandle, DriverConnection, StatementHandle};
use crate::error::{DriverError, ExecuteError, PrepareError, StatementError};
use crate::executor::binder::ParameterBinder;
use crate::executor::cursor::RowCursor;
use crate::executor::handler::{ExecutionMode, StatementKind};
use crate::executor::results::{ResultRow, RowConsumer, RowFlow};
use crate::mapping::BoundStatement;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Lifecycle of one handler.
///
/// The linear discipline the contract demands: prepare exactly once, then
/// bind/batch, then one terminal operation. Closed is reached through
/// failure-path release; misuse surfaces immediately instead of leaking a
/// half-driven native handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HandlerState {
    Unprepared,
    Prepared,
    Executed,
    Closed,
}

impl HandlerState {
    fn name(&self) -> &'static str {
        match self {
            HandlerState::Unprepared => "unprepared",
            HandlerState::Prepared => "prepared",
            HandlerState::Executed => "executed",
            HandlerState::Closed => "closed",
        }
    }
}

/// State and plumbing shared by every handler variant.
pub(crate) struct HandlerCore {
    kind: StatementKind,
    mode: ExecutionMode,
    bound: Arc<BoundStatement>,
    binder: ParameterBinder,
    state: HandlerState,
    connection: Option<Arc<Mutex<dyn DriverConnection>>>,
    statement: Option<StatementHandle>,
    batched_rows: u64,
}

impl HandlerCore {
    pub(crate) fn new(
        kind: StatementKind,
        mode: ExecutionMode,
        bound: Arc<BoundStatement>,
        binder: ParameterBinder,
    ) -> Self {
        Self {
            kind,
            mode,
            bound,
            binder,
            state: HandlerState::Unprepared,
            connection: None,
            statement: None,
            batched_rows: 0,
        }
    }

    pub(crate) fn bound(&self) -> &BoundStatement {
        &self.bound
    }

    pub(crate) fn binder(&self) -> &ParameterBinder {
        &self.binder
    }

    pub(crate) fn binder_mut(&mut self) -> &mut ParameterBinder {
        &mut self.binder
    }

    pub(crate) fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Connection and handle for post-execution work (output read-back).
    pub(crate) fn connection_and_statement(
        &self,
    ) -> Option<(Arc<Mutex<dyn DriverConnection>>, StatementHandle)> {
        match (&self.connection, self.statement) {
            (Some(connection), Some(statement)) => Some((Arc::clone(connection), statement)),
            _ => None,
        }
    }

    /// Allocate the native statement handle, exactly once.
    pub(crate) async fn prepare(
        &mut self,
        connection: Arc<Mutex<dyn DriverConnection>>,
        transaction_timeout: Option<Duration>,
    ) -> Result<StatementHandle, StatementError> {
        if self.state != HandlerState::Unprepared {
            return Err(PrepareError::AlreadyPrepared.into());
        }

        let handle = {
            let mut conn = connection.lock().await;
            if !conn.is_open() {
                return Err(PrepareError::ConnectionClosed.into());
            }
            conn.prepare_statement(self.bound.sql(), transaction_timeout)
                .await
                .map_err(|e| match e {
                    DriverError::ConnectionClosed => PrepareError::ConnectionClosed,
                    other => PrepareError::Rejected {
                        sql: self.bound.sql().to_string(),
                        message: other.to_string(),
                    },
                })?
        };

        debug!(kind = %self.kind, handle = handle.as_i64(), "statement prepared");
        self.connection = Some(connection);
        self.statement = Some(handle);
        self.state = HandlerState::Prepared;
        Ok(handle)
    }

    /// Validate state and handle ownership before an operation.
    pub(crate) fn check_prepared(
        &self,
        operation: &'static str,
        statement: StatementHandle,
    ) -> Result<(Arc<Mutex<dyn DriverConnection>>, StatementHandle), StatementError> {
        if self.state != HandlerState::Prepared {
            return Err(ExecuteError::InvalidState {
                operation,
                state: self.state.name().to_string(),
                detail: "handler must be prepared and not yet executed".to_string(),
            }
            .into());
        }

        match (&self.connection, self.statement) {
            (Some(connection), Some(own)) if own == statement => {
                Ok((Arc::clone(connection), own))
            }
            (_, Some(own)) => Err(ExecuteError::InvalidState {
                operation,
                state: self.state.name().to_string(),
                detail: format!(
                    "statement handle {} does not belong to this handler (owns {})",
                    statement.as_i64(),
                    own.as_i64()
                ),
            }
            .into()),
            _ => Err(ExecuteError::InvalidState {
                operation,
                state: self.state.name().to_string(),
                detail: "no native statement handle".to_string(),
            }
            .into()),
        }
    }

    /// Apply every input parameter through the binder.
    pub(crate) async fn parameterize(
        &mut self,
        statement: StatementHandle,
    ) -> Result<(), StatementError> {
        let (connection, handle) = self.check_prepared("parameterize", statement)?;
        if let Err(e) = self.binder.apply_all(&connection, handle).await {
            self.release().await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Append the bound parameter set to the pending batch.
    pub(crate) async fn batch(&mut self, statement: StatementHandle) -> Result<(), StatementError> {
        if self.mode != ExecutionMode::Batch {
            return Err(ExecuteError::InvalidState {
                operation: "batch",
                state: self.state.name().to_string(),
                detail: "handler was constructed in direct mode".to_string(),
            }
            .into());
        }
        let (connection, handle) = self.check_prepared("batch", statement)?;

        if let Err(e) = connection.lock().await.add_batch(handle).await {
            self.release().await;
            return Err(ExecuteError::Driver {
                message: e.to_string(),
            }
            .into());
        }
        self.batched_rows += 1;
        Ok(())
    }

    /// Execute as a mutation; terminal.
    pub(crate) async fn update(
        &mut self,
        statement: StatementHandle,
    ) -> Result<u64, StatementError> {
        let (connection, handle) = self.check_prepared("update", statement)?;

        let result = match self.mode {
            ExecutionMode::Direct => connection.lock().await.execute_update(handle).await,
            ExecutionMode::Batch => {
                if self.batched_rows == 0 {
                    // Empty batch: nothing to send, nothing affected.
                    self.state = HandlerState::Executed;
                    return Ok(0);
                }
                connection
                    .lock()
                    .await
                    .execute_batch(handle)
                    .await
                    .map(|counts| counts.iter().sum())
            }
        };

        match result {
            Ok(count) => {
                debug!(kind = %self.kind, rows = count, "update executed");
                self.state = HandlerState::Executed;
                Ok(count)
            }
            Err(e) => {
                self.release().await;
                Err(ExecuteError::Driver {
                    message: e.to_string(),
                }
                .into())
            }
        }
    }

    /// Execute as a retrieval, pushing every row to the consumer; terminal.
    pub(crate) async fn query(
        &mut self,
        statement: StatementHandle,
        consumer: &mut dyn RowConsumer,
    ) -> Result<Vec<ResultRow>, StatementError> {
        let (connection, handle) = self.check_prepared("query", statement)?;

        let response = match connection.lock().await.execute_query(handle).await {
            Ok(response) => response,
            Err(e) => {
                self.release().await;
                return Err(ExecuteError::Driver {
                    message: e.to_string(),
                }
                .into());
            }
        };
        self.state = HandlerState::Executed;

        let columns = Arc::new(response.columns);
        let retrieval = response.cursor;
        let mut page = response.first_page;
        let mut rows = Vec::new();

        loop {
            let last = page.last;
            for values in page.rows {
                let row = ResultRow::new(Arc::clone(&columns), values);
                let flow = consumer.consume(&row);
                rows.push(row);
                if flow == RowFlow::Stop {
                    // Early termination: stop fetching, release promptly.
                    Self::close_retrieval(&connection, retrieval).await;
                    return Ok(rows);
                }
            }

            if last {
                break;
            }
            let Some(cursor) = retrieval else { break };

            page = match connection.lock().await.fetch_rows(cursor).await {
                Ok(page) => page,
                Err(e) => {
                    Self::close_retrieval(&connection, retrieval).await;
                    self.release().await;
                    return Err(ExecuteError::Driver {
                        message: e.to_string(),
                    }
                    .into());
                }
            };
        }

        Self::close_retrieval(&connection, retrieval).await;
        Ok(rows)
    }

    /// Execute as a retrieval, handing the open retrieval to a cursor;
    /// terminal for the handler, not for the retrieval.
    pub(crate) async fn query_cursor(
        &mut self,
        statement: StatementHandle,
    ) -> Result<RowCursor, StatementError> {
        let (connection, handle) = self.check_prepared("query_cursor", statement)?;

        let response = match connection.lock().await.execute_query(handle).await {
            Ok(response) => response,
            Err(e) => {
                self.release().await;
                return Err(ExecuteError::Driver {
                    message: e.to_string(),
                }
                .into());
            }
        };
        self.state = HandlerState::Executed;

        Ok(RowCursor::new(connection, response))
    }

    /// Best-effort release of the native handle; parks the handler Closed.
    pub(crate) async fn release(&mut self) {
        self.state = HandlerState::Closed;
        if let (Some(connection), Some(handle)) = (self.connection.take(), self.statement.take()) {
            if let Err(e) = connection.lock().await.close_statement(handle).await {
                warn!(error = %e, "failed to release statement handle");
            }
        }
    }

    async fn close_retrieval(
        connection: &Arc<Mutex<dyn DriverConnection>>,
        retrieval: Option<CursorHandle>,
    ) {
        if let Some(handle) = retrieval {
            if let Err(e) = connection.lock().await.close_cursor(handle).await {
                warn!(error = %e, "failed to release retrieval");
            }
        }
    }
}
