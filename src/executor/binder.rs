//! Parameter binding and type-aware conversion.
//!
//! The binder applies runtime values to the positional slots of a native
//! statement. Conversion is descriptor-driven: the declared semantic type
//! picks the conversion path, never the runtime value's shape.

use crate::driver::{DriverConnection, StatementHandle};
use crate::error::BindError;
use crate::mapping::{
    BoundStatement, ParameterDescriptor, ParameterSet, ParameterValue, SemanticType,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Applies a parameter set to a native statement, slot by slot.
///
/// The binder holds no driver state of its own; each `bind` is a pure
/// function of the descriptor and value, applied through the connection.
pub struct ParameterBinder {
    bound: Arc<BoundStatement>,
    parameters: ParameterSet,
}

impl ParameterBinder {
    /// Create a binder for one bound statement and value set.
    pub fn new(bound: Arc<BoundStatement>, parameters: ParameterSet) -> Self {
        Self { bound, parameters }
    }

    /// Get the current parameter values.
    pub fn parameter_set(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Replace the parameter values.
    ///
    /// Used between batch rows: re-bind fresh values, then `parameterize`
    /// and `batch` again without re-preparing.
    pub fn set_parameters(&mut self, parameters: ParameterSet) {
        self.parameters = parameters;
    }

    /// Convert a runtime value for one descriptor.
    ///
    /// # Errors
    ///
    /// Returns `BindError::MissingParameter` when a non-nullable slot has
    /// no value, and `BindError::TypeConversion` when the semantic type
    /// has no conversion path for the value's kind.
    pub fn convert(
        descriptor: &ParameterDescriptor,
        value: Option<&ParameterValue>,
    ) -> Result<serde_json::Value, BindError> {
        let value = match value {
            None | Some(ParameterValue::Null) => {
                return if descriptor.nullable {
                    Ok(serde_json::Value::Null)
                } else {
                    Err(BindError::MissingParameter {
                        position: descriptor.position,
                        property: descriptor.property.clone(),
                    })
                };
            }
            Some(v) => v,
        };

        let converted = match (descriptor.semantic_type, value) {
            (SemanticType::Boolean, ParameterValue::Boolean(b)) => serde_json::json!(b),
            (SemanticType::BigInt, ParameterValue::Integer(i)) => serde_json::json!(i),
            (SemanticType::Double, ParameterValue::Integer(i)) => serde_json::json!(*i as f64),
            (SemanticType::Double, ParameterValue::Float(f)) => {
                if !f.is_finite() {
                    return Err(Self::no_conversion(
                        descriptor,
                        "NaN and infinity are not supported",
                    ));
                }
                serde_json::json!(f)
            }
            (SemanticType::Varchar, ParameterValue::Text(s)) => serde_json::json!(s),
            // Binary travels hex-encoded
            (SemanticType::Binary, ParameterValue::Bytes(b)) => serde_json::json!(hex::encode(b)),
            (SemanticType::Date | SemanticType::Timestamp, ParameterValue::Text(s)) => {
                serde_json::json!(s)
            }
            (_, other) => {
                return Err(Self::no_conversion(
                    descriptor,
                    &format!("no conversion path from a {} value", other.kind_name()),
                ));
            }
        };

        Ok(converted)
    }

    /// Convert and write one value to its positional slot.
    ///
    /// # Errors
    ///
    /// Returns `BindError::PositionOutOfRange` when the descriptor does
    /// not belong to this statement, conversion errors from `convert`,
    /// and `BindError::Driver` when the driver refuses the value.
    pub async fn bind(
        &self,
        connection: &Arc<Mutex<dyn DriverConnection>>,
        statement: StatementHandle,
        descriptor: &ParameterDescriptor,
        value: Option<&ParameterValue>,
    ) -> Result<(), BindError> {
        if descriptor.position >= self.bound.parameter_count() {
            return Err(BindError::PositionOutOfRange {
                position: descriptor.position,
                count: self.bound.parameter_count(),
            });
        }

        let converted = Self::convert(descriptor, value)?;

        connection
            .lock()
            .await
            .bind_parameter(statement, descriptor.position, converted)
            .await
            .map_err(|e| BindError::Driver {
                position: descriptor.position,
                message: e.to_string(),
            })
    }

    /// Apply every input descriptor in ascending position order.
    pub async fn apply_all(
        &self,
        connection: &Arc<Mutex<dyn DriverConnection>>,
        statement: StatementHandle,
    ) -> Result<(), BindError> {
        // Descriptors are position-sorted by BoundStatement construction.
        for descriptor in self.bound.parameters() {
            if !descriptor.mode.is_input() {
                continue;
            }
            let value = self.parameters.get(&descriptor.property);
            self.bind(connection, statement, descriptor, value).await?;
        }
        Ok(())
    }

    /// Read back every output descriptor after execution.
    ///
    /// # Returns
    ///
    /// Pairs of source property path and raw driver value, in ascending
    /// position order.
    pub async fn read_outputs(
        &self,
        connection: &Arc<Mutex<dyn DriverConnection>>,
        statement: StatementHandle,
    ) -> Result<Vec<(String, serde_json::Value)>, BindError> {
        let mut outputs = Vec::new();
        for descriptor in self.bound.parameters() {
            if !descriptor.mode.is_output() {
                continue;
            }
            let value = connection
                .lock()
                .await
                .read_output_parameter(statement, descriptor.position)
                .await
                .map_err(|e| BindError::Driver {
                    position: descriptor.position,
                    message: e.to_string(),
                })?;
            outputs.push((descriptor.property.clone(), value));
        }
        Ok(outputs)
    }

    fn no_conversion(descriptor: &ParameterDescriptor, message: &str) -> BindError {
        BindError::TypeConversion {
            position: descriptor.position,
            property: descriptor.property.clone(),
            semantic: descriptor.semantic_type.to_string(),
            message: message.to_string(),
        }
    }
}
