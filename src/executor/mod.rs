//! Statement execution core.
//!
//! This module turns a bound statement plus runtime parameter values into
//! an executed database statement, and the response back into rows or an
//! affected-row count.
//!
//! # Overview
//!
//! The executor is organized into:
//! - `handler` - The `StatementHandler` contract, variant selection and routing
//! - `base` - Plumbing shared by the three variants
//! - `simple` / `prepared` / `callable` - The variant implementations
//! - `binder` - Parameter conversion and positional application
//! - `results` - Result rows and the push-style consumer
//! - `cursor` - The lazy pull-style cursor
//!
//! # Example
//!
//! ```no_run
//! use sqlexec::driver::DriverConnection;
//! use sqlexec::executor::{handler_for, ExecutionMode, RowFlow};
//! use sqlexec::mapping::{BoundStatement, ParameterDescriptor, ParameterSet, SemanticType};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! # async fn example(
//! #     connection: Arc<Mutex<dyn DriverConnection>>,
//! # ) -> Result<(), sqlexec::error::StatementError> {
//! let bound = Arc::new(BoundStatement::new(
//!     "SELECT id, name FROM users WHERE age > ?",
//!     vec![ParameterDescriptor::input(0, "age", SemanticType::BigInt)],
//! )?);
//! let values = ParameterSet::new().with_value("age", 18i64);
//!
//! let mut handler = handler_for(bound, values, ExecutionMode::Direct)?;
//! let statement = handler.prepare(connection, None).await?;
//! handler.parameterize(statement).await?;
//!
//! let rows = handler
//!     .query(statement, &mut |_row: &sqlexec::executor::ResultRow| RowFlow::Continue)
//!     .await?;
//! println!("fetched {} rows", rows.len());
//! # Ok(())
//! # }
//! ```

pub(crate) mod base;
pub mod binder;
pub mod callable;
pub mod cursor;
pub mod handler;
pub mod prepared;
pub mod results;
pub mod simple;

// Re-export commonly used types
pub use binder::ParameterBinder;
pub use callable::CallableStatementHandler;
pub use cursor::RowCursor;
pub use handler::{handler_for, ExecutionMode, StatementHandler, StatementKind};
pub use prepared::PreparedStatementHandler;
pub use results::{ResultRow, RowConsumer, RowFlow};
pub use simple::SimpleStatementHandler;
