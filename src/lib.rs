//! # sqlexec
//!
//! Statement-execution core for a SQL persistence runtime.
//!
//! This library is the layer between a mapping layer (which decides what
//! SQL to run and how runtime values map onto its placeholders) and a
//! connectivity layer (which owns physical connections and native
//! statement resources). It unifies three execution styles behind one
//! contract - plain, prepared and callable statements - with single-shot
//! and batched mutation, and eager or streaming retrieval.
//!
//! ## Example
//!
//! ```no_run
//! use sqlexec::driver::DriverConnection;
//! use sqlexec::executor::{handler_for, ExecutionMode};
//! use sqlexec::mapping::{BoundStatement, ParameterDescriptor, ParameterSet, SemanticType};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! # async fn example(
//! #     connection: Arc<Mutex<dyn DriverConnection>>,
//! # ) -> Result<(), sqlexec::error::StatementError> {
//! // The mapping layer hands down a bound statement and values.
//! let bound = Arc::new(BoundStatement::new(
//!     "INSERT INTO users(id, name) VALUES(?,?)",
//!     vec![
//!         ParameterDescriptor::input(0, "id", SemanticType::BigInt),
//!         ParameterDescriptor::input(1, "name", SemanticType::Varchar),
//!     ],
//! )?);
//! let values = ParameterSet::new().with_value("id", 1i64).with_value("name", "Alice");
//!
//! // The variant is picked from the statement's shape.
//! let mut handler = handler_for(bound, values, ExecutionMode::Direct)?;
//!
//! // prepare -> parameterize -> one terminal operation.
//! let statement = handler.prepare(connection, None).await?;
//! handler.parameterize(statement).await?;
//! let affected = handler.update(statement).await?;
//! assert_eq!(affected, 1);
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod driver;
pub mod error;
pub mod executor;
pub mod mapping;

// Re-export public API
pub use driver::{ColumnInfo, CursorHandle, DriverConnection, QueryResponse, RowPage, StatementHandle};
pub use error::{
    BindError, CursorError, DriverError, ExecuteError, MappingError, PrepareError, StatementError,
};
pub use executor::{
    handler_for, CallableStatementHandler, ExecutionMode, ParameterBinder,
    PreparedStatementHandler, ResultRow, RowConsumer, RowCursor, RowFlow, SimpleStatementHandler,
    StatementHandler, StatementKind,
};
pub use mapping::{
    BoundStatement, ParameterDescriptor, ParameterMode, ParameterSet, ParameterValue, SemanticType,
};
