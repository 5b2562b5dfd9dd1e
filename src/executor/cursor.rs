//! Lazy, forward-only row cursor.
//!
//! A `RowCursor` pulls rows from an open retrieval on demand. It is
//! single-pass and never restartable: each advance may suspend on the
//! driver, and the underlying native resource stays open until the cursor
//! is exhausted or closed.

use crate::driver::{ColumnInfo, CursorHandle, DriverConnection, QueryResponse};
use crate::error::CursorError;
use crate::executor::results::ResultRow;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

/// Pull-style row sequence backed by an open retrieval.
///
/// Rows are fetched one driver page at a time; the cursor holds at most
/// one unconsumed page. The native resource is released on exhaustion, on
/// `close`, and must otherwise be released by calling `close` before
/// abandoning the cursor (`Drop` cannot run async cleanup and only logs).
pub struct RowCursor {
    connection: Arc<Mutex<dyn DriverConnection>>,
    handle: Option<CursorHandle>,
    columns: Arc<Vec<ColumnInfo>>,
    buffer: VecDeque<Vec<serde_json::Value>>,
    fetched_last: bool,
    closed: bool,
}

impl RowCursor {
    /// Create a cursor over a retrieval response.
    pub(crate) fn new(
        connection: Arc<Mutex<dyn DriverConnection>>,
        response: QueryResponse,
    ) -> Self {
        Self {
            connection,
            handle: response.cursor,
            columns: Arc::new(response.columns),
            buffer: response.first_page.rows.into(),
            fetched_last: response.first_page.last,
            closed: false,
        }
    }

    /// Get the result column descriptions.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Whether the cursor has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Check whether another row is available.
    ///
    /// May fetch the next page from the driver. Returns `false` after
    /// `close` rather than failing; only advancing a closed cursor is an
    /// error.
    pub async fn has_next(&mut self) -> Result<bool, CursorError> {
        if self.closed {
            return Ok(false);
        }
        self.fill().await?;
        Ok(!self.buffer.is_empty())
    }

    /// Advance to the next row.
    ///
    /// # Returns
    ///
    /// `None` once the retrieval is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `CursorError::Closed` when advanced after `close`, and
    /// `CursorError::Driver` when a fetch fails (the native resource is
    /// released before the error propagates).
    pub async fn next(&mut self) -> Result<Option<ResultRow>, CursorError> {
        if self.closed {
            return Err(CursorError::Closed);
        }
        self.fill().await?;

        match self.buffer.pop_front() {
            Some(values) => Ok(Some(ResultRow::new(Arc::clone(&self.columns), values))),
            None => Ok(None),
        }
    }

    /// Close the cursor and release the native resource.
    ///
    /// Idempotent: safe to call repeatedly and after exhaustion.
    pub async fn close(&mut self) -> Result<(), CursorError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.buffer.clear();
        self.fetched_last = true;

        if let Some(handle) = self.handle.take() {
            self.connection
                .lock()
                .await
                .close_cursor(handle)
                .await
                .map_err(|e| CursorError::Driver {
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// Refill the buffer from the driver if it ran dry.
    async fn fill(&mut self) -> Result<(), CursorError> {
        while self.buffer.is_empty() && !self.fetched_last {
            let Some(handle) = self.handle else {
                self.fetched_last = true;
                break;
            };

            let fetch_result = self.connection.lock().await.fetch_rows(handle).await;
            let page = match fetch_result {
                Ok(page) => page,
                Err(e) => {
                    // Release before propagating; the retrieval is dead.
                    self.release_handle().await;
                    return Err(CursorError::Driver {
                        message: e.to_string(),
                    });
                }
            };

            self.buffer.extend(page.rows);
            if page.last {
                self.fetched_last = true;
            }
        }

        // Exhausted and drained: the server side can go away now.
        if self.fetched_last && self.buffer.is_empty() {
            self.release_handle().await;
        }
        Ok(())
    }

    /// Best-effort release of the native resource.
    async fn release_handle(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.connection.lock().await.close_cursor(handle).await {
                warn!(error = %e, "failed to release cursor handle");
            }
        }
    }
}

impl std::fmt::Debug for RowCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowCursor")
            .field("handle", &self.handle)
            .field("buffered", &self.buffer.len())
            .field("fetched_last", &self.fetched_last)
            .field("closed", &self.closed)
            .finish()
    }
}

impl Drop for RowCursor {
    fn drop(&mut self) {
        // Async cleanup is impossible here; callers should close() before
        // abandoning a cursor. The driver will reap the orphan eventually.
        if self.handle.is_some() {
            warn!("RowCursor dropped without close(); native resource released late");
        }
    }
}
