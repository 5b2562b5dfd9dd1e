//! Callable statement handler.
//!
//! Stored-procedure invocations. On top of the prepared path, Out and
//! InOut descriptors are read back through the binder once execution
//! completes, and surface via `outputs`.

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

/// Handler for stored-procedure invocations.
pub struct CallableStatementHandler {
    core: HandlerCore,
    outputs: Vec<(String, serde_json::Value)>,
}

impl CallableStatementHandler {
    /// Create a handler for one procedure invocation.
    pub fn new(bound: Arc<BoundStatement>, parameters: ParameterSet, mode: ExecutionMode) -> Self {
        let binder = ParameterBinder::new(Arc::clone(&bound), parameters);
        Self {
            core: HandlerCore::new(StatementKind::Callable, mode, bound, binder),
            outputs: Vec::new(),
        }
    }

    /// Output parameter values read back by the last `update` or `query`.
    ///
    /// Pairs of source property path and raw driver value, in ascending
    /// position order. Empty until a terminal operation completes. After
    /// `query_cursor` the read-back is the caller's duty, through
    /// `parameter_binder().read_outputs(..)`, once the cursor is drained.
    pub fn outputs(&self) -> &[(String, serde_json::Value)] {
        &self.outputs
    }

    async fn read_back(&mut self) -> Result<(), StatementError> {
        if !self.core.bound().has_output_parameters() {
            return Ok(());
        }
        let Some((connection, statement)) = self.core.connection_and_statement() else {
            return Ok(());
        };
        match self.core.binder().read_outputs(&connection, statement).await {
            Ok(outputs) => {
                self.outputs = outputs;
                Ok(())
            }
            Err(e) => {
                self.core.release().await;
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl StatementHandler for CallableStatementHandler {
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
        let count = self.core.update(statement).await?;
        self.read_back().await?;
        Ok(count)
    }

    async fn query(
        &mut self,
        statement: StatementHandle,
        consumer: &mut dyn RowConsumer,
    ) -> Result<Vec<ResultRow>, StatementError> {
        let rows = self.core.query(statement, consumer).await?;
        self.read_back().await?;
        Ok(rows)
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
