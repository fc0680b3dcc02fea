//! Text file input node
//!
//! Source node: reads the entire content of its bound text resource and
//! exposes it on the `Text` output.

use log::debug;

use crate::nodes::factory::{
    NodeCategory, NodeFactory, NodeMetadata, SocketDefinition, SocketSchema,
};
use crate::nodes::node::NodeKind;
use crate::nodes::socket::{DataType, SocketValue};
use crate::resources::TextStore;

pub(crate) fn socket_schema() -> SocketSchema {
    SocketSchema {
        inputs: vec![],
        outputs: vec![SocketDefinition::new("Text", DataType::String)],
    }
}

/// Computes the output writes for a text file input node.
///
/// Withholds while unbound or while the bound resource is missing, so the
/// last good output persists.
pub(crate) fn compute(resource: Option<&str>, store: &dyn TextStore) -> Vec<(String, SocketValue)> {
    let Some(id) = resource else {
        return Vec::new();
    };
    match store.read(id) {
        Some(text) => vec![("Text".to_string(), SocketValue::String(text))],
        None => {
            debug!("text resource \"{}\" is missing, keeping last output", id);
            Vec::new()
        }
    }
}

/// Text file input node factory
#[derive(Default)]
pub struct TextFileInputNodeFactory;

impl NodeFactory for TextFileInputNodeFactory {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            "TextFileInput",
            "Text File Input",
            NodeCategory::file_io(),
            "Reads the full content of a bound text resource",
        )
        .with_outputs(socket_schema().outputs)
        .with_tags(vec!["text", "file", "input", "source"])
    }

    fn kind() -> NodeKind {
        NodeKind::TextFileInput
    }
}
