//! Text file output node
//!
//! Sink node: overwrites the entire content of its bound text resource with
//! the value on the `Text` input. Clear-then-write, never append.

use crate::nodes::factory::{
    NodeCategory, NodeFactory, NodeMetadata, SocketDefinition, SocketSchema,
};
use crate::nodes::node::NodeKind;
use crate::nodes::propagation::NodeInputs;
use crate::nodes::socket::DataType;
use crate::resources::TextStore;

pub(crate) fn socket_schema() -> SocketSchema {
    SocketSchema {
        inputs: vec![SocketDefinition::new("Text", DataType::String)],
        outputs: vec![],
    }
}

/// Overwrites the bound resource with the input text.
///
/// Withholds while unbound or while the input is absent.
pub(crate) fn compute(inputs: &NodeInputs, resource: Option<&str>, store: &mut dyn TextStore) {
    let (Some(id), Some(text)) = (resource, inputs.string("Text")) else {
        return;
    };
    store.write(id, text);
}

/// Text file output node factory
#[derive(Default)]
pub struct TextFileOutputNodeFactory;

impl NodeFactory for TextFileOutputNodeFactory {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            "TextFileOutput",
            "Text File Output",
            NodeCategory::file_io(),
            "Overwrites a bound text resource with the input value",
        )
        .with_inputs(socket_schema().inputs)
        .with_tags(vec!["text", "file", "output", "sink"])
    }

    fn kind() -> NodeKind {
        NodeKind::TextFileOutput
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::socket::SocketValue;
    use crate::resources::{MemoryTextStore, TextStore};

    #[test]
    fn test_overwrites_resource() {
        let mut store = MemoryTextStore::new();
        store.insert("out.txt", "old longer content");
        let inputs = NodeInputs::from_pairs([("Text", SocketValue::from("abc"))]);
        compute(&inputs, Some("out.txt"), &mut store);
        assert_eq!(store.read("out.txt"), Some("abc".to_string()));
    }

    #[test]
    fn test_withholds_without_binding_or_input() {
        let mut store = MemoryTextStore::new();
        store.insert("out.txt", "untouched");
        compute(&NodeInputs::default(), Some("out.txt"), &mut store);
        let inputs = NodeInputs::from_pairs([("Text", SocketValue::from("abc"))]);
        compute(&inputs, None, &mut store);
        assert_eq!(store.read("out.txt"), Some("untouched".to_string()));
    }
}
