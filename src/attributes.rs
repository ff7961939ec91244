// 🏛️ Attribute Schema
// Each class declares its attributes up front: name, type and default.
// Update coerces raw console text through the declared type.

use crate::error::CommandError;
use serde_json::Value;

// ============================================================================
// ATTRIBUTE TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Integer,
    Float,
    List,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Integer => "integer",
            AttributeType::Float => "float",
            AttributeType::List => "list",
        }
    }

    /// Zero value used when an attribute was never set on an instance
    pub fn default_value(&self) -> Value {
        match self {
            AttributeType::String => Value::String(String::new()),
            AttributeType::Integer => Value::from(0),
            AttributeType::Float => Value::from(0.0),
            AttributeType::List => Value::Array(Vec::new()),
        }
    }

    /// Cast console text to this type.
    ///
    /// Numbers accept surrounding whitespace. Lists must be a JSON array,
    /// which is what the bracket literal form of the parser hands over.
    pub fn coerce(&self, attribute: &str, raw: &str) -> Result<Value, CommandError> {
        let invalid = || CommandError::InvalidValue {
            attribute: attribute.to_string(),
            expected: self.as_str().to_string(),
        };

        match self {
            AttributeType::String => Ok(Value::String(raw.to_string())),
            AttributeType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| invalid()),
            AttributeType::Float => {
                let parsed = raw.trim().parse::<f64>().map_err(|_| invalid())?;
                // NaN and infinities have no JSON form
                serde_json::Number::from_f64(parsed)
                    .map(Value::Number)
                    .ok_or_else(invalid)
            }
            AttributeType::List => match serde_json::from_str::<Value>(raw.trim()) {
                Ok(Value::Array(items)) => Ok(Value::Array(items)),
                _ => Err(invalid()),
            },
        }
    }
}

// ============================================================================
// ATTRIBUTE DEFINITION
// ============================================================================

/// One declared attribute of a class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub name: &'static str,
    pub type_: AttributeType,
}

impl AttributeDefinition {
    pub const fn new(name: &'static str, type_: AttributeType) -> Self {
        AttributeDefinition { name, type_ }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, AttributeType::Integer)
    }

    pub const fn float(name: &'static str) -> Self {
        Self::new(name, AttributeType::Float)
    }

    pub const fn list(name: &'static str) -> Self {
        Self::new(name, AttributeType::List)
    }

    pub fn default_value(&self) -> Value {
        self.type_.default_value()
    }
}

/// Look up an attribute by name in a class schema
pub fn find<'a>(schema: &'a [AttributeDefinition], name: &str) -> Option<&'a AttributeDefinition> {
    schema.iter().find(|def| def.name == name)
}

// ============================================================================
// TESTS
// ============================================================================
