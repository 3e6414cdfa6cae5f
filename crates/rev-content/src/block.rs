//! Block value type

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute carrying a block's explicit identity
pub const ID_ATTRIBUTE: &str = "id";

/// A structured content block
///
/// Blocks are immutable values once built: diffing only reads them and
/// merging only moves them between documents. Attributes are kept in a
/// sorted map so that structural hashing is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Type tag used for section classification (e.g. "guide/step")
    #[serde(rename = "type")]
    type_tag: String,
    /// Attribute map with unique, sorted keys
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, Value>,
    /// Raw inner content
    #[serde(default)]
    inner_content: String,
    /// Ordered child blocks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Block>,
}

impl Block {
    /// Create an empty block of the given type
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            attributes: BTreeMap::new(),
            inner_content: String::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing any previous value for the key
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set the explicit identity attribute
    pub fn with_id(self, id: impl Into<Value>) -> Self {
        self.with_attr(ID_ATTRIBUTE, id)
    }

    /// Set the inner content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.inner_content = content.into();
        self
    }

    /// Append a child block
    pub fn with_child(mut self, child: Block) -> Self {
        self.children.push(child);
        self
    }

    /// Replace all child blocks
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn inner_content(&self) -> &str {
        &self.inner_content
    }

    pub fn children(&self) -> &[Block] {
        &self.children
    }

    /// The explicit identifier, if the `id` attribute is a non-empty string
    /// or a number
    ///
    /// Numbers are rendered as text, so `1` and `"1"` read the same here;
    /// block matching uses [`identify`](crate::identify), which keeps them apart.
    pub fn explicit_id(&self) -> Option<String> {
        match self.attributes.get(ID_ATTRIBUTE)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn explicit_id_reads_string_and_number() {
        assert_eq!(
            Block::new("p").with_id("intro").explicit_id().as_deref(),
            Some("intro")
        );
        assert_eq!(Block::new("p").with_id(42).explicit_id().as_deref(), Some("42"));
    }

    #[test]
    fn explicit_id_ignores_empty_and_non_scalar_values() {
        assert_eq!(Block::new("p").with_id("").explicit_id(), None);
        assert_eq!(Block::new("p").with_id(json!(["a"])).explicit_id(), None);
        assert_eq!(Block::new("p").with_id(Value::Null).explicit_id(), None);
        assert_eq!(Block::new("p").explicit_id(), None);
    }

    #[test]
    fn with_attr_overwrites_existing_key() {
        let block = Block::new("p").with_attr("level", 1).with_attr("level", 2);
        assert_eq!(block.attributes().len(), 1);
        assert_eq!(block.attr("level"), Some(&json!(2)));
    }

    #[test]
    fn deserializes_with_defaults() {
        let block: Block = serde_json::from_str(r#"{"type": "guide/step"}"#).unwrap();
        assert_eq!(block.type_tag(), "guide/step");
        assert!(block.attributes().is_empty());
        assert_eq!(block.inner_content(), "");
        assert!(block.children().is_empty());
    }

    #[test]
    fn serializes_nested_children() {
        let block = Block::new("list")
            .with_id("l1")
            .with_child(Block::new("item").with_content("one"));

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "list",
                "attributes": {"id": "l1"},
                "inner_content": "",
                "children": [{"type": "item", "inner_content": "one"}]
            })
        );
    }
}
