//! Runtime parameter values supplied by the mapping layer.

use std::collections::HashMap;

/// Runtime value for one statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// NULL value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Text value
    Text(String),
    /// Binary data
    Bytes(Vec<u8>),
}

impl ParameterValue {
    /// Short name of the value's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParameterValue::Null => "null",
            ParameterValue::Boolean(_) => "boolean",
            ParameterValue::Integer(_) => "integer",
            ParameterValue::Float(_) => "float",
            ParameterValue::Text(_) => "text",
            ParameterValue::Bytes(_) => "bytes",
        }
    }

    /// Whether this is the NULL value.
    pub fn is_null(&self) -> bool {
        matches!(self, ParameterValue::Null)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Boolean(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        ParameterValue::Integer(value as i64)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Integer(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Float(value)
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::Text(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

impl From<Vec<u8>> for ParameterValue {
    fn from(value: Vec<u8>) -> Self {
        ParameterValue::Bytes(value)
    }
}

impl<T: Into<ParameterValue>> From<Option<T>> for ParameterValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => ParameterValue::Null,
        }
    }
}

/// Set of runtime parameter values, keyed by source property path.
///
/// The mapping layer resolves a caller's parameter object into this flat
/// set; descriptors then address values by their `property` path.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    values: HashMap<String, ParameterValue>,
}

impl ParameterSet {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, consuming and returning the set.
    pub fn with_value(mut self, property: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.values.insert(property.into(), value.into());
        self
    }

    /// Insert or replace a value.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<ParameterValue>) {
        self.values.insert(property.into(), value.into());
    }

    /// Look up a value by property path.
    pub fn get(&self, property: &str) -> Option<&ParameterValue> {
        self.values.get(property)
    }

    /// Number of values in the set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        let _v: ParameterValue = true.into();
        let _v: ParameterValue = 42i32.into();
        let _v: ParameterValue = 42i64.into();
        let _v: ParameterValue = 2.5f64.into();
        let _v: ParameterValue = "test".into();
        let _v: ParameterValue = String::from("test").into();
        let _v: ParameterValue = vec![1u8, 2, 3].into();
    }

    #[test]
    fn test_option_conversion() {
        let some: ParameterValue = Some(7i64).into();
        assert_eq!(some, ParameterValue::Integer(7));

        let none: ParameterValue = Option::<i64>::None.into();
        assert!(none.is_null());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ParameterValue::Null.kind_name(), "null");
        assert_eq!(ParameterValue::Boolean(true).kind_name(), "boolean");
        assert_eq!(ParameterValue::Integer(1).kind_name(), "integer");
        assert_eq!(ParameterValue::Float(1.0).kind_name(), "float");
        assert_eq!(ParameterValue::Text("x".into()).kind_name(), "text");
        assert_eq!(ParameterValue::Bytes(vec![]).kind_name(), "bytes");
    }

    #[test]
    fn test_parameter_set_lookup() {
        let set = ParameterSet::new()
            .with_value("user.id", 42i64)
            .with_value("user.name", "Alice");

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("user.id"), Some(&ParameterValue::Integer(42)));
        assert_eq!(
            set.get("user.name"),
            Some(&ParameterValue::Text("Alice".to_string()))
        );
        assert!(set.get("user.missing").is_none());
    }

    #[test]
    fn test_parameter_set_replace() {
        let mut set = ParameterSet::new().with_value("id", 1i64);
        set.set("id", 2i64);
        assert_eq!(set.get("id"), Some(&ParameterValue::Integer(2)));
        assert_eq!(set.len(), 1);
    }
}
