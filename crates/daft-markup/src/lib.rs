//! Daft Markup
//!
//! Converts between markup arrays and HTML strings.
//!
//! A markup array is a structured description of an element:
//! `{"!element": "h1", "!attributes": {"class": ["title"]}, "!content": ["Hi"]}`.
//! Untyped input arrives as `serde_json::Value` and is validated into
//! [`MarkupNode`] trees before anything is written. Parsing goes the other
//! way through html5ever.

pub mod attributes;
pub mod entities;
mod error;
pub mod grammar;
mod html5_entities;
mod node;
mod options;
mod parser;
mod serializer;
pub mod validator;

pub use error::{MarkupError, Result};
pub use node::{AttributeValue, Attributes, Content, MarkupNode, Scalar, content_to_value};
pub use options::{EncodeOptions, EntityFlags, ParseFilters, QuoteStyle};
pub use parser::Parser;
pub use serializer::Serializer;
pub use validator::{validate_attributes, validate_markup};

use serde_json::Value;

/// Render one markup array as HTML
pub fn markup_array_to_string(markup: &Value, options: &EncodeOptions) -> Result<String> {
    Serializer::new(options.clone()).serialize_value(markup)
}

/// Render a list of markup arrays and scalars as HTML
pub fn markup_collection_to_string(items: &[Value], options: &EncodeOptions) -> Result<String> {
    Serializer::new(options.clone()).serialize_value_collection(items)
}

/// Parse an HTML fragment into markup content
pub fn markup_string_to_array(html: &str, filters: &ParseFilters) -> Result<Vec<Content>> {
    Parser::new(filters.clone()).parse_fragment(html)
}
