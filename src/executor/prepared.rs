//! Prepared statement handler.
//!
//! The workhorse variant: positional placeholders, binder-driven
//! parameter application, optional batch accumulation.

use crate::driver::{DriverConnection, StatementHandle};
use crate::error::StatementError;
use crate::executor::base::HandlerCore;
use crate::executor::binder::ParameterBinder;
use crate::executor::cursor::RowCursor;
use crate::executor::handler::{ExecutionMode, StatementHandler, StatementKind};
use crate::executor::results::{ResultRow, RowConsumer};
use crate::mapping::{BoundStatement, ParameterSet};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Handler for pre-compiled statements with positional placeholders.
pub struct PreparedStatementHandler {
    core: HandlerCore,
}

impl PreparedStatementHandler {
    /// Create a handler for one bound statement and value set.
    ///
    /// The bound statement's construction already guarantees that the
    /// placeholder count matches the descriptor count.
    pub fn new(bound: Arc<BoundStatement>, parameters: ParameterSet, mode: ExecutionMode) -> Self {
        let binder = ParameterBinder::new(Arc::clone(&bound), parameters);
        Self {
            core: HandlerCore::new(StatementKind::Prepared, mode, bound, binder),
        }
    }
}

#[async_trait]
impl StatementHandler for PreparedStatementHandler {
    async fn prepare(
        &mut self,
        connection: Arc<Mutex<dyn DriverConnection>>,
        transaction_timeout: Option<Duration>,
    ) -> Result<StatementHandle, StatementError> {
        self.core.prepare(connection, transaction_timeout).await
    }

    async fn parameterize(&mut self, statement: StatementHandle) -> Result<(), StatementError> {
        self.core.parameterize(statement).await
    }

    async fn batch(&mut self, statement: StatementHandle) -> Result<(), StatementError> {
        self.core.batch(statement).await
    }

    async fn update(&mut self, statement: StatementHandle) -> Result<u64, StatementError> {
        self.core.update(statement).await
    }

    async fn query(
        &mut self,
        statement: StatementHandle,
        consumer: &mut dyn RowConsumer,
    ) -> Result<Vec<ResultRow>, StatementError> {
        self.core.query(statement, consumer).await
    }

    async fn query_cursor(
        &mut self,
        statement: StatementHandle,
    ) -> Result<RowCursor, StatementError> {
        self.core.query_cursor(statement).await
    }

    fn bound_statement(&self) -> &BoundStatement {
        self.core.bound()
    }

    fn parameter_binder(&self) -> &ParameterBinder {
        self.core.binder()
    }

    fn parameter_binder_mut(&mut self) -> &mut ParameterBinder {
        self.core.binder_mut()
    }

    fn kind(&self) -> StatementKind {
        self.core.kind()
    }
}
