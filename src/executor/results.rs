//! Result rows and the push-style row consumer.
//!
//! A `ResultRow` is raw data: an ordered mapping from column index (or
//! name) to an unconverted column value. Object assembly belongs to the
//! mapping layer; callers that need to keep a row beyond one consumption
//! step clone it explicitly.

use crate::driver::ColumnInfo;
use std::sync::Arc;

/// Flow-control signal returned by a push consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFlow {
    /// Keep delivering rows
    Continue,
    /// Stop retrieval; release native resources promptly
    Stop,
}

/// Push-style receiver of result rows.
///
/// The handler delivers rows one at a time in source order and stops
/// fetching the first time `Stop` is returned.
pub trait RowConsumer: Send {
    /// Receive one row.
    fn consume(&mut self, row: &ResultRow) -> RowFlow;
}

// Any FnMut closure over a row works as a consumer.
impl<F> RowConsumer for F
where
    F: FnMut(&ResultRow) -> RowFlow + Send,
{
    fn consume(&mut self, row: &ResultRow) -> RowFlow {
        self(row)
    }
}

/// One raw result row.
///
/// The column header is shared across every row of one retrieval.
#[derive(Debug, Clone)]
pub struct ResultRow {
    columns: Arc<Vec<ColumnInfo>>,
    values: Vec<serde_json::Value>,
}

impl ResultRow {
    /// Create a row over a shared column header.
    pub(crate) fn new(columns: Arc<Vec<ColumnInfo>>, values: Vec<serde_json::Value>) -> Self {
        Self { columns, values }
    }

    /// Get a column value by index.
    pub fn get(&self, index: usize) -> Option<&serde_json::Value> {
        self.values.get(index)
    }

    /// Get a column value by column name.
    pub fn get_named(&self, name: &str) -> Option<&serde_json::Value> {
        let index = self.columns.iter().position(|c| c.name == name)?;
        self.values.get(index)
    }

    /// Get the column descriptions.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Get all values in column order.
    pub fn values(&self) -> &[serde_json::Value] {
        &self.values
    }

    /// Consume the row, keeping only its values.
    pub fn into_values(self) -> Vec<serde_json::Value> {
        self.values
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> ResultRow {
        let columns = Arc::new(vec![
            ColumnInfo::new("id", "BIGINT"),
            ColumnInfo::new("name", "VARCHAR"),
        ]);
        ResultRow::new(
            columns,
            vec![serde_json::json!(1), serde_json::json!("Alice")],
        )
    }

    #[test]
    fn test_get_by_index() {
        let row = sample_row();
        assert_eq!(row.get(0), Some(&serde_json::json!(1)));
        assert_eq!(row.get(1), Some(&serde_json::json!("Alice")));
        assert!(row.get(2).is_none());
    }

    #[test]
    fn test_get_by_name() {
        let row = sample_row();
        assert_eq!(row.get_named("name"), Some(&serde_json::json!("Alice")));
        assert!(row.get_named("missing").is_none());
    }

    #[test]
    fn test_row_len() {
        let row = sample_row();
        assert_eq!(row.len(), 2);
        assert!(!row.is_empty());
    }

    #[test]
    fn test_into_values() {
        let row = sample_row();
        let values = row.into_values();
        assert_eq!(values, vec![serde_json::json!(1), serde_json::json!("Alice")]);
    }

    #[test]
    fn test_closure_is_a_consumer() {
        let mut seen = 0usize;
        let mut consumer = |_row: &ResultRow| {
            seen += 1;
            RowFlow::Continue
        };

        let row = sample_row();
        assert_eq!(RowConsumer::consume(&mut consumer, &row), RowFlow::Continue);
        drop(consumer);
        assert_eq!(seen, 1);
    }
}
