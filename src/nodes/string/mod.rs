//! String manipulation node
//!
//! One node kind with a variant selector: New passes a string through,
//! Concatenate joins two strings, Substring takes an extended slice driven
//! by a begin/end/step triple.

pub mod logic;

use serde::{Deserialize, Serialize};

use super::factory::{NodeCategory, NodeFactory, NodeMetadata, SocketDefinition, SocketSchema};
use super::node::NodeKind;
use super::socket::{DataType, SocketValue};

/// Variant selector for the String node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringMode {
    New,
    Concatenate,
    Substring,
}

impl StringMode {
    /// All variants, in menu order
    pub fn all() -> [StringMode; 3] {
        [
            StringMode::New,
            StringMode::Concatenate,
            StringMode::Substring,
        ]
    }

    /// Display label for host UIs
    pub fn label(&self) -> &'static str {
        match self {
            StringMode::New => "New",
            StringMode::Concatenate => "Concatenate",
            StringMode::Substring => "Substring",
        }
    }
}

/// Socket layout for a String node variant
pub fn socket_schema(mode: StringMode) -> SocketSchema {
    let output = vec![SocketDefinition::new("String", DataType::String)];
    match mode {
        StringMode::New => SocketSchema {
            inputs: vec![SocketDefinition::new("String", DataType::String)],
            outputs: output,
        },
        StringMode::Concatenate => SocketSchema {
            inputs: vec![
                SocketDefinition::new("String", DataType::String),
                SocketDefinition::new("String 2", DataType::String),
            ],
            outputs: output,
        },
        StringMode::Substring => SocketSchema {
            inputs: vec![
                SocketDefinition::new("String", DataType::String),
                SocketDefinition::new("B:E:S", DataType::Int3)
                    .with_default(SocketValue::Int3([0, 10, 1])),
            ],
            outputs: output,
        },
    }
}

/// String node factory
#[derive(Default)]
pub struct StringNodeFactory;

impl NodeFactory for StringNodeFactory {
    fn metadata() -> NodeMetadata {
        let schema = socket_schema(StringMode::New);
        NodeMetadata::new(
            "String",
            "String",
            NodeCategory::types(),
            "String manipulation with passthrough, concatenate and substring variants",
        )
        .with_inputs(schema.inputs)
        .with_outputs(schema.outputs)
        .with_variants(StringMode::all().iter().map(|m| m.label()).collect())
        .with_tags(vec!["string", "text", "concatenate", "substring"])
    }

    fn kind() -> NodeKind {
        NodeKind::String(StringMode::New)
    }
}
