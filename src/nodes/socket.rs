//! Socket types and value storage for node data ports

use serde::{Deserialize, Serialize};
use std::fmt;

/// Data types that can flow through sockets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Text string
    String,
    /// 3-component integer vector
    Int3,
}

impl DataType {
    /// Check if this data type can connect to another
    pub fn can_connect_to(&self, other: &DataType) -> bool {
        self == other
    }

    /// Get a human-readable name for this data type
    pub fn name(&self) -> &'static str {
        match self {
            DataType::String => "String",
            DataType::Int3 => "Int3",
        }
    }

    /// Get an RGBA color hint representing this data type, for host UIs
    pub fn color(&self) -> [f32; 4] {
        match self {
            DataType::String => [0.01, 0.5, 0.08, 1.0], // Green
            DataType::Int3 => [0.5, 0.0, 1.0, 1.0],     // Purple
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed value held by a socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketValue {
    String(String),
    Int3([i32; 3]),
}

impl SocketValue {
    /// The data type this value belongs to
    pub fn data_type(&self) -> DataType {
        match self {
            SocketValue::String(_) => DataType::String,
            SocketValue::Int3(_) => DataType::Int3,
        }
    }

    /// Borrow the inner string, if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SocketValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Copy the inner triple, if this is an Int3 value
    pub fn as_int3(&self) -> Option<[i32; 3]> {
        match self {
            SocketValue::Int3(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for SocketValue {
    fn from(s: &str) -> Self {
        SocketValue::String(s.to_string())
    }
}

impl From<[i32; 3]> for SocketValue {
    fn from(v: [i32; 3]) -> Self {
        SocketValue::Int3(v)
    }
}

/// Direction of a socket (input or output)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketDirection {
    Input,
    Output,
}

impl fmt::Display for SocketDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketDirection::Input => f.write_str("input"),
            SocketDirection::Output => f.write_str("output"),
        }
    }
}

/// A typed, named data port on a node.
///
/// The stored value is `None` until something writes it: an unset socket
/// reads as absent rather than as a zero value. For input sockets the stored
/// value acts as the default used while the socket is unlinked; for output
/// sockets it is the last computed result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Socket {
    pub name: String,
    pub direction: SocketDirection,
    pub data_type: DataType,
    value: Option<SocketValue>,
}

impl Socket {
    /// Creates a new unset socket
    pub fn new(name: impl Into<String>, direction: SocketDirection, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            direction,
            data_type,
            value: None,
        }
    }

    /// Creates a socket pre-loaded with a default value
    pub fn with_value(
        name: impl Into<String>,
        direction: SocketDirection,
        value: SocketValue,
    ) -> Self {
        let data_type = value.data_type();
        Self {
            name: name.into(),
            direction,
            data_type,
            value: Some(value),
        }
    }

    /// Checks if this socket is an input
    pub fn is_input(&self) -> bool {
        matches!(self.direction, SocketDirection::Input)
    }

    /// Checks if this socket is an output
    pub fn is_output(&self) -> bool {
        matches!(self.direction, SocketDirection::Output)
    }

    /// The currently stored value, `None` if never set
    pub fn value(&self) -> Option<&SocketValue> {
        self.value.as_ref()
    }

    /// Stores a value, returning whether the observable value changed.
    ///
    /// Writing the value the socket already holds is a no-op and returns
    /// `false` unless `force` is set, so downstream notification can be
    /// skipped. A value of the wrong type is rejected and logged.
    pub fn write(&mut self, value: SocketValue, force: bool) -> bool {
        if value.data_type() != self.data_type {
            log::warn!(
                "ignoring {} write to {} socket \"{}\"",
                value.data_type(),
                self.data_type,
                self.name
            );
            return false;
        }
        if !force && self.value.as_ref() == Some(&value) {
            return false;
        }
        self.value = Some(value);
        true
    }
}
