//! Markup Serialization
//!
//! Renders markup nodes and content lists to HTML strings.
//!
//! Key features:
//! - Validation of every node before any of it is written
//! - Self-closing element handling, HTML or XML style
//! - Separate escaping rules for text and attribute values
//! - Optional attribute canonicalization for element builders

use serde_json::Value;

use crate::attributes::{canonicalize, encode_attributes};
use crate::entities::encode;
use crate::error::Result;
use crate::grammar::is_self_closing;
use crate::node::{Content, MarkupNode, Scalar};
use crate::options::EncodeOptions;
use crate::validator::content_from_value;

/// Markup serializer
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    options: EncodeOptions,
}

impl Serializer {
    pub fn new(options: EncodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Validate and render an untyped markup node
    pub fn serialize_value(&self, markup: &Value) -> Result<String> {
        let node = MarkupNode::try_from(markup)?;
        self.serialize_node(&node)
    }

    /// Render a typed node and its descendants
    pub fn serialize_node(&self, node: &MarkupNode) -> Result<String> {
        self.options.check_encoding()?;
        tracing::debug!("Serializing <{}>", node.element);
        let mut output = String::new();
        self.write_node(node, &mut output)?;
        Ok(output)
    }

    /// Render a content list
    pub fn serialize_collection(&self, items: &[Content]) -> Result<String> {
        self.options.check_encoding()?;
        let mut output = String::new();
        self.write_collection(items, &mut output)?;
        Ok(output)
    }

    /// Render an untyped content list; `null` entries are skipped
    pub fn serialize_value_collection(&self, items: &[Value]) -> Result<String> {
        let content = items
            .iter()
            .filter(|item| !item.is_null())
            .map(content_from_value)
            .collect::<Result<Vec<_>>>()?;
        self.serialize_collection(&content)
    }

    fn write_node(&self, node: &MarkupNode, output: &mut String) -> Result<()> {
        node.validate()?;
        tracing::trace!(
            "Writing <{}> with {} attributes, {} children",
            node.element,
            node.attributes.len(),
            node.content.len()
        );

        let tag = node.element.as_str();
        let flags = &self.options.flags;

        // Start tag
        output.push('<');
        output.push_str(tag);

        let double_encode = self.options.double_encode;
        if self.options.canonical_attributes {
            let attributes = canonicalize(node.attributes.clone());
            output.push_str(&encode_attributes(&attributes, flags, double_encode));
        } else {
            output.push_str(&encode_attributes(&node.attributes, flags, double_encode));
        }

        if node.content.is_empty() && is_self_closing(tag) {
            output.push_str(if self.options.xml_style { "/>" } else { ">" });
            return Ok(());
        }

        output.push('>');
        self.write_collection(&node.content, output)?;

        // End tag
        output.push_str("</");
        output.push_str(tag);
        output.push('>');

        Ok(())
    }

    fn write_collection(&self, items: &[Content], output: &mut String) -> Result<()> {
        for item in items {
            match item {
                Content::Node(node) => self.write_node(node, output)?,
                Content::Text(text) => self.write_text(text, output),
            }
        }
        Ok(())
    }

    fn write_text(&self, text: &Scalar, output: &mut String) {
        output.push_str(&encode(
            &text.to_markup_string(),
            &self.options.flags,
            self.options.double_encode,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(markup: Value) -> String {
        Serializer::default().serialize_value(&markup).unwrap()
    }

    #[test]
    fn test_void_elements() {
        assert_eq!(render(json!({"!element": "br"})), "<br>");
        assert_eq!(
            Serializer::new(EncodeOptions::xml())
                .serialize_value(&json!({"!element": "br"}))
                .unwrap(),
            "<br/>"
        );
        assert_eq!(render(json!({"!element": "img", "!content": []})), "<img>");
    }

    #[test]
    fn test_void_element_with_children_gets_closed() {
        assert_eq!(
            render(json!({"!element": "br", "!content": ["x"]})),
            "<br>x</br>"
        );
    }

    #[test]
    fn test_empty_element_is_closed() {
        assert_eq!(render(json!({"!element": "p"})), "<p></p>");
        assert_eq!(
            Serializer::new(EncodeOptions::xml())
                .serialize_value(&json!({"!element": "p"}))
                .unwrap(),
            "<p></p>"
        );
    }

    #[test]
    fn test_text_escaping_differs_from_attributes() {
        assert_eq!(
            render(json!({
                "!element": "h1",
                "!attributes": {"title": "a/b"},
                "!content": ["<Foo/>"],
            })),
            r#"<h1 title="a/b">&lt;Foo&sol;&gt;</h1>"#
        );
    }

    #[test]
    fn test_canonical_attributes_option() {
        let markup = json!({
            "!element": "html",
            "!attributes": {"translate": false, "draggable": true, "class": ["no-js"]},
        });
        assert_eq!(
            render(markup.clone()),
            r#"<html draggable class="no-js"></html>"#
        );

        let options = EncodeOptions {
            canonical_attributes: true,
            ..EncodeOptions::default()
        };
        assert_eq!(
            Serializer::new(options).serialize_value(&markup).unwrap(),
            r#"<html class="no-js" draggable="true" translate="no"></html>"#
        );
    }

    #[test]
    fn test_nested_failure_yields_no_output() {
        let result = Serializer::default().serialize_value(&json!({
            "!element": "div",
            "!content": ["ok", {"!element": "Bad"}],
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_typed_node_is_revalidated() {
        let node = MarkupNode::new("div").with_child(MarkupNode::new("no good"));
        assert!(Serializer::default().serialize_node(&node).is_err());
    }

    #[test]
    fn test_unsupported_encoding() {
        let options = EncodeOptions {
            encoding: "Shift_JIS".into(),
            ..EncodeOptions::default()
        };
        assert!(Serializer::new(options).serialize_value(&json!({"!element": "p"})).is_err());
    }
}
