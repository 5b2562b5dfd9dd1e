//! Simple statement handler.
//!
//! Plain statements carry no parameter placeholders: `parameterize` is a
//! contractual no-op and `batch` is not supported at all.

use crate::driver::{DriverConnection, StatementHandle};
use crate::error::{ExecuteError, MappingError, StatementError};
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

/// Handler for plain statements without placeholders.
pub struct SimpleStatementHandler {
    core: HandlerCore,
}

impl SimpleStatementHandler {
    /// Create a handler for a parameterless bound statement.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::ParametersNotSupported` when the bound
    /// statement carries parameter descriptors.
    pub fn new(bound: Arc<BoundStatement>, mode: ExecutionMode) -> Result<Self, MappingError> {
        if !bound.parameters().is_empty() {
            return Err(MappingError::ParametersNotSupported {
                kind: StatementKind::Simple.as_str().to_string(),
            });
        }
        let binder = ParameterBinder::new(Arc::clone(&bound), ParameterSet::new());
        Ok(Self {
            core: HandlerCore::new(StatementKind::Simple, mode, bound, binder),
        })
    }
}

impl std::fmt::Debug for SimpleStatementHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleStatementHandler").finish()
    }
}

#[async_trait]
impl StatementHandler for SimpleStatementHandler {
    async fn prepare(
        &mut self,
        connection: Arc<Mutex<dyn DriverConnection>>,
        transaction_timeout: Option<Duration>,
    ) -> Result<StatementHandle, StatementError> {
        self.core.prepare(connection, transaction_timeout).await
    }

    async fn parameterize(&mut self, statement: StatementHandle) -> Result<(), StatementError> {
        // No placeholders to fill; validate the call, touch nothing.
        self.core.check_prepared("parameterize", statement)?;
        Ok(())
    }

    async fn batch(&mut self, _statement: StatementHandle) -> Result<(), StatementError> {
        Err(ExecuteError::UnsupportedOperation {
            operation: "batch",
            kind: StatementKind::Simple.as_str().to_string(),
        }
        .into())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::protocol::mock::MockDriver;
    use crate::driver::{ColumnInfo, QueryResponse};
    use crate::executor::results::RowFlow;
    use crate::mapping::{ParameterDescriptor, SemanticType};

    fn select_bound() -> Arc<BoundStatement> {
        Arc::new(BoundStatement::new("SELECT id, name FROM t", vec![]).unwrap())
    }

    fn open_driver() -> MockDriver {
        let mut driver = MockDriver::new();
        driver.expect_is_open().returning(|| true);
        driver
    }

    #[test]
    fn test_construction_rejects_descriptors() {
        let bound = Arc::new(
            BoundStatement::new(
                "SELECT * FROM t WHERE id = ?",
                vec![ParameterDescriptor::input(0, "id", SemanticType::BigInt)],
            )
            .unwrap(),
        );
        let err = SimpleStatementHandler::new(bound, ExecutionMode::Direct).unwrap_err();
        assert!(matches!(err, MappingError::ParametersNotSupported { .. }));
    }

    #[tokio::test]
    async fn test_parameterize_is_a_noop() {
        let mut driver = open_driver();
        driver
            .expect_prepare_statement()
            .times(1)
            .returning(|_, _| Ok(StatementHandle::new(5)));
        // No bind_parameter expectation: the driver must see none.
        driver.expect_bind_parameter().times(0);

        let connection: Arc<Mutex<dyn DriverConnection>> = Arc::new(Mutex::new(driver));
        let mut handler = SimpleStatementHandler::new(select_bound(), ExecutionMode::Direct).unwrap();

        let handle = handler.prepare(connection, None).await.unwrap();
        handler.parameterize(handle).await.unwrap();
    }

    #[tokio::test]
    async fn test_batch_is_unsupported() {
        let mut driver = open_driver();
        driver
            .expect_prepare_statement()
            .times(1)
            .returning(|_, _| Ok(StatementHandle::new(5)));

        let connection: Arc<Mutex<dyn DriverConnection>> = Arc::new(Mutex::new(driver));
        let mut handler = SimpleStatementHandler::new(select_bound(), ExecutionMode::Batch).unwrap();

        let handle = handler.prepare(connection, None).await.unwrap();
        let err = handler.batch(handle).await.unwrap_err();
        assert!(matches!(
            err,
            StatementError::Execute(ExecuteError::UnsupportedOperation {
                operation: "batch",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_query_collects_all_rows() {
        let mut driver = open_driver();
        driver
            .expect_prepare_statement()
            .times(1)
            .returning(|_, _| Ok(StatementHandle::new(5)));
        driver.expect_execute_query().times(1).returning(|_| {
            Ok(QueryResponse::complete(
                vec![
                    ColumnInfo::new("id", "BIGINT"),
                    ColumnInfo::new("name", "VARCHAR"),
                ],
                vec![
                    vec![serde_json::json!(1), serde_json::json!("Alice")],
                    vec![serde_json::json!(2), serde_json::json!("Bob")],
                    vec![serde_json::json!(3), serde_json::json!("Cara")],
                ],
            ))
        });

        let connection: Arc<Mutex<dyn DriverConnection>> = Arc::new(Mutex::new(driver));
        let mut handler = SimpleStatementHandler::new(select_bound(), ExecutionMode::Direct).unwrap();

        let handle = handler.prepare(connection, None).await.unwrap();
        handler.parameterize(handle).await.unwrap();

        let mut consumer = |_row: &ResultRow| RowFlow::Continue;
        let rows = handler.query(handle, &mut consumer).await.unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get_named("name"), Some(&serde_json::json!("Alice")));
        assert_eq!(rows[2].get_named("id"), Some(&serde_json::json!(3)));
    }

    #[tokio::test]
    async fn test_query_stops_when_consumer_says_stop() {
        let mut driver = open_driver();
        driver
            .expect_prepare_statement()
            .times(1)
            .returning(|_, _| Ok(StatementHandle::new(5)));
        driver.expect_execute_query().times(1).returning(|_| {
            Ok(QueryResponse::complete(
                vec![ColumnInfo::new("id", "BIGINT")],
                vec![
                    vec![serde_json::json!(1)],
                    vec![serde_json::json!(2)],
                    vec![serde_json::json!(3)],
                ],
            ))
        });

        let connection: Arc<Mutex<dyn DriverConnection>> = Arc::new(Mutex::new(driver));
        let mut handler = SimpleStatementHandler::new(select_bound(), ExecutionMode::Direct).unwrap();

        let handle = handler.prepare(connection, None).await.unwrap();

        let mut accepted = 0usize;
        let mut consumer = move |_row: &ResultRow| {
            accepted += 1;
            if accepted == 2 {
                RowFlow::Stop
            } else {
                RowFlow::Continue
            }
        };
        let rows = handler.query(handle, &mut consumer).await.unwrap();

        // Two rows were offered to the consumer; the third never was.
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_direct_update_for_ddl() {
        let mut driver = open_driver();
        driver
            .expect_prepare_statement()
            .times(1)
            .returning(|_, _| Ok(StatementHandle::new(5)));
        driver
            .expect_execute_update()
            .times(1)
            .returning(|_| Ok(0));

        let connection: Arc<Mutex<dyn DriverConnection>> = Arc::new(Mutex::new(driver));
        let bound = Arc::new(BoundStatement::new("TRUNCATE TABLE audit_log", vec![]).unwrap());
        let mut handler = SimpleStatementHandler::new(bound, ExecutionMode::Direct).unwrap();

        let handle = handler.prepare(connection, None).await.unwrap();
        assert_eq!(handler.update(handle).await.unwrap(), 0);
    }
}
