//! Common test utilities for sqlexec integration tests.
//!
//! # Overview
//!
//! Integration tests drive the execution core end to end against
//! `ScriptedDriver`, an in-memory `DriverConnection` that serves
//! pre-configured results and records every primitive invocation in a
//! shared journal. Unlike the unit tests, which mock individual driver
//! calls, these tests assert on whole call sequences: what the driver was
//! asked to do, and in which order.
//!
//! # Usage
//!
//! ```ignore
//! let driver = ScriptedDriver::new().with_update_count(1);
//! let journal = driver.journal();
//! let connection = driver.into_connection();
//! // ... drive a handler ...
//! assert_eq!(journal.lock().unwrap().as_slice(), &[...]);
//! ```

use async_trait::async_trait;
use sqlexec::{
    ColumnInfo, CursorHandle, DriverConnection, DriverError, QueryResponse, RowPage,
    StatementHandle,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

/// Journal of driver primitive invocations, shared with the test body.
pub type Journal = Arc<StdMutex<Vec<DriverCall>>>;

/// Record of one driver primitive invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    Prepare { sql: String },
    Bind { position: usize, value: serde_json::Value },
    AddBatch,
    ExecuteUpdate,
    ExecuteBatch { rows: u64 },
    ExecuteQuery,
    Fetch,
    CloseCursor,
    ReadOutput { position: usize },
    CloseStatement,
}

/// In-memory `DriverConnection` serving scripted results.
pub struct ScriptedDriver {
    open: bool,
    next_handle: i64,
    update_counts: VecDeque<u64>,
    row_effects: VecDeque<u64>,
    pending_batch: u64,
    columns: Vec<ColumnInfo>,
    pages: VecDeque<RowPage>,
    outputs: HashMap<usize, serde_json::Value>,
    journal: Journal,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self {
            open: true,
            next_handle: 100,
            update_counts: VecDeque::new(),
            row_effects: VecDeque::new(),
            pending_batch: 0,
            columns: Vec::new(),
            pages: VecDeque::new(),
            outputs: HashMap::new(),
            journal: Arc::new(StdMutex::new(Vec::new())),
        }
    }

    /// Mark the connection closed.
    pub fn closed(mut self) -> Self {
        self.open = false;
        self
    }

    /// Script the count returned by the next `execute_update`.
    pub fn with_update_count(mut self, count: u64) -> Self {
        self.update_counts.push_back(count);
        self
    }

    /// Script per-row affected counts served by `execute_batch`.
    pub fn with_row_effects(mut self, effects: &[u64]) -> Self {
        self.row_effects.extend(effects.iter().copied());
        self
    }

    /// Script a result set, split into pages of `page_size` rows.
    pub fn with_rows(
        mut self,
        columns: Vec<ColumnInfo>,
        rows: Vec<Vec<serde_json::Value>>,
        page_size: usize,
    ) -> Self {
        assert!(page_size > 0, "page_size must be positive");
        self.columns = columns;

        let total = rows.len();
        let mut pages: VecDeque<RowPage> = VecDeque::new();
        let mut chunk = Vec::new();
        for (index, row) in rows.into_iter().enumerate() {
            chunk.push(row);
            if chunk.len() == page_size || index + 1 == total {
                pages.push_back(RowPage::new(std::mem::take(&mut chunk), index + 1 == total));
            }
        }
        if pages.is_empty() {
            pages.push_back(RowPage::empty());
        }
        self.pages = pages;
        self
    }

    /// Script the value read back for an output parameter position.
    pub fn with_output(mut self, position: usize, value: serde_json::Value) -> Self {
        self.outputs.insert(position, value);
        self
    }

    /// Get the shared call journal before handing the driver off.
    pub fn journal(&self) -> Journal {
        Arc::clone(&self.journal)
    }

    /// Wrap the driver in the connection seam handlers expect.
    pub fn into_connection(self) -> Arc<tokio::sync::Mutex<dyn DriverConnection>> {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    fn record(&self, call: DriverCall) {
        self.journal.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DriverConnection for ScriptedDriver {
    fn is_open(&self) -> bool {
        self.open
    }

    async fn prepare_statement(
        &mut self,
        sql: &str,
        _transaction_timeout: Option<Duration>,
    ) -> Result<StatementHandle, DriverError> {
        self.record(DriverCall::Prepare {
            sql: sql.to_string(),
        });
        self.next_handle += 1;
        Ok(StatementHandle::new(self.next_handle))
    }

    async fn bind_parameter(
        &mut self,
        _statement: StatementHandle,
        position: usize,
        value: serde_json::Value,
    ) -> Result<(), DriverError> {
        self.record(DriverCall::Bind { position, value });
        Ok(())
    }

    async fn add_batch(&mut self, _statement: StatementHandle) -> Result<(), DriverError> {
        self.record(DriverCall::AddBatch);
        self.pending_batch += 1;
        Ok(())
    }

    async fn execute_update(&mut self, _statement: StatementHandle) -> Result<u64, DriverError> {
        self.record(DriverCall::ExecuteUpdate);
        Ok(self.update_counts.pop_front().unwrap_or(1))
    }

    async fn execute_batch(
        &mut self,
        _statement: StatementHandle,
    ) -> Result<Vec<u64>, DriverError> {
        let rows = std::mem::take(&mut self.pending_batch);
        self.record(DriverCall::ExecuteBatch { rows });
        let counts = (0..rows)
            .map(|_| self.row_effects.pop_front().unwrap_or(1))
            .collect();
        Ok(counts)
    }

    async fn execute_query(
        &mut self,
        _statement: StatementHandle,
    ) -> Result<QueryResponse, DriverError> {
        self.record(DriverCall::ExecuteQuery);
        let first_page = self.pages.pop_front().unwrap_or_else(RowPage::empty);
        if first_page.last {
            Ok(QueryResponse {
                columns: self.columns.clone(),
                first_page,
                cursor: None,
            })
        } else {
            Ok(QueryResponse::streaming(
                self.columns.clone(),
                first_page,
                CursorHandle::new(77),
            ))
        }
    }

    async fn fetch_rows(&mut self, _cursor: CursorHandle) -> Result<RowPage, DriverError> {
        self.record(DriverCall::Fetch);
        Ok(self.pages.pop_front().unwrap_or_else(RowPage::empty))
    }

    async fn close_cursor(&mut self, _cursor: CursorHandle) -> Result<(), DriverError> {
        self.record(DriverCall::CloseCursor);
        Ok(())
    }

    async fn read_output_parameter(
        &mut self,
        _statement: StatementHandle,
        position: usize,
    ) -> Result<serde_json::Value, DriverError> {
        self.record(DriverCall::ReadOutput { position });
        Ok(self
            .outputs
            .get(&position)
            .cloned()
            .unwrap_or(serde_json::Value::Null))
    }

    async fn close_statement(&mut self, _statement: StatementHandle) -> Result<(), DriverError> {
        self.record(DriverCall::CloseStatement);
        Ok(())
    }
}

/// Count journal entries matching a predicate.
pub fn count_calls(journal: &Journal, predicate: impl Fn(&DriverCall) -> bool) -> usize {
    journal
        .lock()
        .unwrap()
        .iter()
        .filter(|c| predicate(c))
        .count()
}
