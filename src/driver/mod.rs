//! Connectivity layer seam.
//!
//! This module defines the boundary between the execution core and the
//! physical database connectivity layer. The core consumes the
//! `DriverConnection` trait; concrete drivers (socket, websocket, embedded)
//! implement it elsewhere.
//!
//! # Architecture
//!
//! The seam is organized into:
//! - `protocol` - The `DriverConnection` trait and resource handles
//! - `rows` - Raw result-shape types (columns, row pages)

pub mod protocol;
pub mod rows;

// Re-export commonly used types
pub use protocol::{CursorHandle, DriverConnection, QueryResponse, StatementHandle};
pub use rows::{ColumnInfo, RowPage};
