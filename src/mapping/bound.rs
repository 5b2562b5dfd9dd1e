//! Bound statements and their parameter metadata.
//!
//! A `BoundStatement` pairs finalized SQL text with ordered parameter
//! descriptors. It is produced by the mapping layer and consumed here;
//! once constructed it never changes, and handlers share it by reference.

use crate::error::MappingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of one parameter slot.
///
/// Conversion is driven by this declared type, never by the runtime
/// value's shape; a null value carries no shape to infer from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemanticType {
    /// Boolean
    Boolean,
    /// 64-bit integer
    BigInt,
    /// Double-precision float
    Double,
    /// Character data
    Varchar,
    /// Raw binary data
    Binary,
    /// Calendar date, ISO-8601 text on the wire
    Date,
    /// Timestamp, ISO-8601 text on the wire
    Timestamp,
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Boolean => write!(f, "BOOLEAN"),
            SemanticType::BigInt => write!(f, "BIGINT"),
            SemanticType::Double => write!(f, "DOUBLE"),
            SemanticType::Varchar => write!(f, "VARCHAR"),
            SemanticType::Binary => write!(f, "BINARY"),
            SemanticType::Date => write!(f, "DATE"),
            SemanticType::Timestamp => write!(f, "TIMESTAMP"),
        }
    }
}

/// Direction of one parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterMode {
    /// Value flows caller to driver
    In,
    /// Value flows driver to caller, read back after execution
    Out,
    /// Both directions
    InOut,
}

impl ParameterMode {
    /// Whether a value is applied before execution.
    pub fn is_input(&self) -> bool {
        matches!(self, ParameterMode::In | ParameterMode::InOut)
    }

    /// Whether a value is read back after execution.
    pub fn is_output(&self) -> bool {
        matches!(self, ParameterMode::Out | ParameterMode::InOut)
    }
}

/// Description of one positional parameter slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    /// Positional slot, 0-based
    pub position: usize,
    /// Source property path in the caller's parameter object
    pub property: String,
    /// Declared semantic type driving conversion
    pub semantic_type: SemanticType,
    /// Direction of the slot
    pub mode: ParameterMode,
    /// Whether a NULL value is acceptable
    pub nullable: bool,
}

impl ParameterDescriptor {
    /// Create a required input descriptor.
    pub fn input(position: usize, property: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            position,
            property: property.into(),
            semantic_type,
            mode: ParameterMode::In,
            nullable: false,
        }
    }

    /// Create an output descriptor.
    pub fn output(position: usize, property: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            position,
            property: property.into(),
            semantic_type,
            mode: ParameterMode::Out,
            nullable: true,
        }
    }

    /// Set the direction.
    pub fn with_mode(mut self, mode: ParameterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Mark the slot as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Finalized SQL text paired with its ordered parameter metadata.
#[derive(Debug, Clone)]
pub struct BoundStatement {
    sql: String,
    parameters: Vec<ParameterDescriptor>,
    result_columns: Option<Vec<String>>,
}

impl BoundStatement {
    /// Create a bound statement, validating its shape.
    ///
    /// Descriptors are stored sorted by position, so iteration order is
    /// ascending position order.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::PlaceholderMismatch` when the number of
    /// positional placeholders in the SQL differs from the descriptor
    /// count, and `MappingError::InvalidPositions` when positions are not
    /// exactly `0..n` with no duplicates.
    pub fn new(
        sql: impl Into<String>,
        parameters: Vec<ParameterDescriptor>,
    ) -> Result<Self, MappingError> {
        let sql = sql.into();

        let placeholders = count_placeholders(&sql);
        if placeholders != parameters.len() {
            return Err(MappingError::PlaceholderMismatch {
                placeholders,
                descriptors: parameters.len(),
            });
        }

        let mut parameters = parameters;
        parameters.sort_by_key(|d| d.position);
        for (expected, descriptor) in parameters.iter().enumerate() {
            if descriptor.position != expected {
                return Err(MappingError::InvalidPositions {
                    detail: format!(
                        "expected position {} but found {} (`{}`)",
                        expected, descriptor.position, descriptor.property
                    ),
                });
            }
        }

        Ok(Self {
            sql,
            parameters,
            result_columns: None,
        })
    }

    /// Attach the expected result column names.
    pub fn with_result_columns(mut self, columns: Vec<String>) -> Self {
        self.result_columns = Some(columns);
        self
    }

    /// Get the SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Get the parameter descriptors, in ascending position order.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Number of parameter slots.
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Get the expected result column names, if declared.
    pub fn result_columns(&self) -> Option<&[String]> {
        self.result_columns.as_deref()
    }

    /// Whether any descriptor is read back after execution.
    pub fn has_output_parameters(&self) -> bool {
        self.parameters.iter().any(|d| d.mode.is_output())
    }
}

/// Count positional `?` placeholders, skipping string literals.
///
/// Single- and double-quoted runs are ignored; a doubled quote inside a
/// literal toggles out and straight back in, which is correct for
/// counting purposes.
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut in_single = false;
    let mut in_double = false;

    for ch in sql.chars() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '?' if !in_single && !in_double => count += 1,
            _ => {}
        }
    }
    count
}
