//! Fragment Parser
//!
//! Uses html5ever's fragment parser with RcDom and converts the resulting
//! tree to markup content, applying the element and attribute filters.

use html5ever::tendril::TendrilSink;
use html5ever::{Attribute, ParseOpts, QualName, local_name, ns, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::{MarkupError, Result};
use crate::grammar::is_boolean_attribute;
use crate::node::{AttributeValue, Attributes, Content, MarkupNode};
use crate::options::ParseFilters;

/// HTML fragment parser
#[derive(Debug, Clone, Default)]
pub struct Parser {
    filters: ParseFilters,
}

impl Parser {
    pub fn new(filters: ParseFilters) -> Self {
        Self { filters }
    }

    pub fn filters(&self) -> &ParseFilters {
        &self.filters
    }

    /// Parse an HTML fragment, as if it were the inner HTML of `<body>`
    pub fn parse_fragment(&self, html: &str) -> Result<Vec<Content>> {
        tracing::debug!("Parsing HTML fragment ({} bytes)", html.len());

        let dom = parse_fragment(
            RcDom::default(),
            ParseOpts::default(),
            QualName::new(None, ns!(html), local_name!("body")),
            Vec::new(),
            false,
        )
        .one(html);

        // The fragment's nodes hang off a synthetic <html> root
        let root = dom.document.children.borrow().first().cloned();
        let Some(root) = root else {
            return Ok(Vec::new());
        };

        let content = self.node_list_to_content(&child_nodes(&root))?;
        tracing::debug!("Parsed {} top-level items", content.len());
        Ok(content)
    }

    /// Convert one DOM node: text becomes a string, elements become nodes
    pub fn node_to_markup(&self, handle: &Handle) -> Result<Content> {
        match &handle.data {
            NodeData::Text { contents } => Ok(Content::from(contents.borrow().to_string())),
            NodeData::Element { .. } => self.element_to_markup(handle),
            other => Err(MarkupError::UnsupportedNodeType(node_type_name(other).to_string())),
        }
    }

    /// Convert an element, or collapse it to its text when the filters drop it
    pub fn element_to_markup(&self, handle: &Handle) -> Result<Content> {
        let NodeData::Element { name, attrs, .. } = &handle.data else {
            return self.node_to_markup(handle);
        };
        let tag = element_name(name);

        if !self.filters.keeps_element(&tag) {
            tracing::trace!("Collapsing <{}> to text", tag);
            return Ok(Content::from(text_content(handle)));
        }

        let attributes = self.obtain_attributes(&tag, &attrs.borrow());
        let children = child_nodes(handle);
        let content = if children.is_empty() {
            Vec::new()
        } else {
            self.node_list_to_content(&children)?
        };

        Ok(Content::Node(MarkupNode {
            element: tag,
            attributes,
            content,
        }))
    }

    /// Convert sibling nodes in order
    pub fn node_list_to_content(&self, nodes: &[Handle]) -> Result<Vec<Content>> {
        nodes.iter().map(|node| self.node_to_markup(node)).collect()
    }

    fn obtain_attributes(&self, tag: &str, attrs: &[Attribute]) -> Attributes {
        attrs
            .iter()
            .map(|attr| (attribute_name(&attr.name), attr.value.to_string()))
            .filter(|(name, _)| self.filters.keeps_attribute(tag, name))
            .map(|(name, value)| {
                let value = if is_boolean_attribute(&name) {
                    AttributeValue::from(value.is_empty())
                } else {
                    AttributeValue::from(value)
                };
                (name, value)
            })
            .collect()
    }
}

fn element_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}

fn attribute_name(name: &QualName) -> String {
    element_name(name)
}

fn node_type_name(data: &NodeData) -> &'static str {
    match data {
        NodeData::Document => "document",
        NodeData::Doctype { .. } => "doctype",
        NodeData::Text { .. } => "text",
        NodeData::Comment { .. } => "comment",
        NodeData::Element { .. } => "element",
        NodeData::ProcessingInstruction { .. } => "processing-instruction",
    }
}

/// Children of a node; a `<template>` exposes its content fragment instead
fn child_nodes(handle: &Handle) -> Vec<Handle> {
    if let NodeData::Element { template_contents, .. } = &handle.data {
        if let Some(contents) = template_contents.borrow().as_ref() {
            return contents.children.borrow().clone();
        }
    }
    handle.children.borrow().clone()
}

/// Concatenated text of all descendant text nodes
fn text_content(handle: &Handle) -> String {
    let mut text = String::new();
    collect_text(handle, &mut text);
    text
}

fn collect_text(handle: &Handle, text: &mut String) {
    for child in child_nodes(handle) {
        match &child.data {
            NodeData::Text { contents } => text.push_str(&contents.borrow()),
            NodeData::Element { .. } => collect_text(&child, text),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Vec<Content> {
        Parser::default().parse_fragment(html).unwrap()
    }

    #[test]
    fn test_parse_void_element() {
        assert_eq!(parse("<br>"), vec![Content::Node(MarkupNode::new("br"))]);
        assert_eq!(parse("<br/>"), vec![Content::Node(MarkupNode::new("br"))]);
    }

    #[test]
    fn test_parse_text_only() {
        assert_eq!(parse("&"), vec![Content::from("&")]);
        assert_eq!(parse(""), Vec::<Content>::new());
    }

    #[test]
    fn test_boolean_attributes() {
        let parsed = parse(r#"<p hidden draggable="true" title="">x</p>"#);
        let node = parsed[0].as_node().unwrap();
        assert_eq!(node.attributes["hidden"], AttributeValue::from(true));
        assert_eq!(node.attributes["draggable"], AttributeValue::from(false));
        assert_eq!(node.attributes["title"], AttributeValue::from(""));
    }

    #[test]
    fn test_comment_is_rejected() {
        let err = Parser::default().parse_fragment("<p>a</p><!-- no -->").unwrap_err();
        assert_eq!(err, MarkupError::UnsupportedNodeType("comment".into()));
    }

    #[test]
    fn test_template_content_is_walked() {
        let parsed = parse("<template><b>x</b></template>");
        let template = parsed[0].as_node().unwrap();
        assert_eq!(template.element, "template");
        assert_eq!(template.content[0].as_node().unwrap().element, "b");
    }

    #[test]
    fn test_excluded_element_collapses_to_nested_text() {
        let parser = Parser::new(ParseFilters::new().exclude("div"));
        let parsed = parser.parse_fragment("<div>a<b>b</b>c</div>").unwrap();
        assert_eq!(parsed, vec![Content::from("abc")]);
    }
}
