//! HTML Element Trait

use daft_markup::{Content, MarkupNode};

use crate::attributes::HtmlAttributes;
use crate::error::Result;

/// An element that renders itself as a markup node
pub trait HtmlElement {
    /// Tag name, valid under the element name grammar
    fn element_name(&self) -> &'static str;

    fn attributes(&self) -> &HtmlAttributes;

    fn attributes_mut(&mut self) -> &mut HtmlAttributes;

    /// Build the element's node. `None` leaves `!content` out.
    fn to_markup_node(&self, content: Option<Vec<Content>>) -> Result<MarkupNode> {
        Ok(MarkupNode::new(self.element_name())
            .with_attributes(self.attributes().markup_attributes())
            .with_content(content.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daft_markup::EncodeOptions;

    #[derive(Default)]
    struct Section {
        attributes: HtmlAttributes,
    }

    impl HtmlElement for Section {
        fn element_name(&self) -> &'static str {
            "section"
        }

        fn attributes(&self) -> &HtmlAttributes {
            &self.attributes
        }

        fn attributes_mut(&mut self) -> &mut HtmlAttributes {
            &mut self.attributes
        }
    }

    #[test]
    fn test_default_markup_node() {
        let mut section = Section::default();
        section.attributes_mut().set_id(Some("main"));
        section.attributes_mut().set_hidden(true);

        let node = section.to_markup_node(Some(vec!["Hi".into()])).unwrap();
        assert_eq!(
            node.to_html(&EncodeOptions::default()).unwrap(),
            r#"<section hidden id="main">Hi</section>"#
        );

        let empty = section.to_markup_node(None).unwrap();
        assert!(empty.content.is_empty());
    }
}
