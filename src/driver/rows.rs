//! Raw result-shape types crossing the driver seam.
//!
//! Column values stay as `serde_json::Value` in this layer. The mapping
//! layer above owns the conversion of raw rows into domain objects; this
//! crate only moves them.

use serde::{Deserialize, Serialize};

/// Description of one result column as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Driver-reported type name
    pub type_name: String,
}

impl ColumnInfo {
    /// Create a new column description.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// One page of raw rows fetched from an open retrieval.
///
/// The driver decides the page size. `last` marks the final page; a fetch
/// after the last page is a driver-contract violation, not something this
/// layer guards against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowPage {
    /// Raw rows, outer index is the row, inner index the column
    pub rows: Vec<Vec<serde_json::Value>>,
    /// Whether this is the final page of the retrieval
    pub last: bool,
}

impl RowPage {
    /// Create a page holding the given rows.
    pub fn new(rows: Vec<Vec<serde_json::Value>>, last: bool) -> Self {
        Self { rows, last }
    }

    /// Create an empty final page.
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            last: true,
        }
    }

    /// Number of rows in this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the page holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
