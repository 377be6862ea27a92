//! Markup Nodes
//!
//! Typed form of the `!element` / `!attributes` / `!content` array
//! representation. Untyped input (`serde_json::Value`) enters through the
//! validator; typed nodes convert back to `Value` losslessly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{MarkupError, Result};
use crate::grammar::{
    ATTRIBUTES_KEY, CONTENT_KEY, ELEMENT_KEY, is_valid_attribute_name, is_valid_element_name,
};
use crate::options::EncodeOptions;
use crate::serializer::Serializer;

/// Attribute map, in the order attributes are rendered
pub type Attributes = IndexMap<String, AttributeValue>;

/// A single scalar: text, number or boolean
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// Read a scalar out of a JSON value; `None` for null, arrays and objects
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or_default()),
            }),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Integer(i) => Value::Number((*i).into()),
            Self::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::Bool(b) => Value::Bool(*b),
        }
    }

    /// Text form used in content and list-valued attributes.
    ///
    /// `true` is `"1"`, `false` is empty, integral floats drop the fraction.
    pub fn to_markup_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => format_float(*f),
            Self::Bool(true) => "1".to_string(),
            Self::Bool(false) => String::new(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Fourteen significant digits, switching to `1.0E+20` style from 1e14 up
/// and below 1e-4, the way PHP casts floats to strings
fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let scientific = format!("{:.13e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();

    if (-4..14).contains(&exponent) {
        // Round-trip through the rounded value to drop trailing zeros
        return scientific
            .parse::<f64>()
            .map_or_else(|_| value.to_string(), |rounded| rounded.to_string());
    }

    let mantissa = mantissa.trim_end_matches('0');
    let sign = if exponent < 0 { '-' } else { '+' };
    if mantissa.ends_with('.') {
        format!("{mantissa}0E{sign}{}", exponent.abs())
    } else {
        format!("{mantissa}E{sign}{}", exponent.abs())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Attribute value: one scalar, or a list joined by spaces on output
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl AttributeValue {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Scalar(s) => s.to_value(),
            Self::List(items) => Value::Array(items.iter().map(Scalar::to_value).collect()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => s.as_str(),
            Self::List(_) => None,
        }
    }
}

macro_rules! attribute_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttributeValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.into())
                }
            }

            impl From<Vec<$ty>> for AttributeValue {
                fn from(values: Vec<$ty>) -> Self {
                    Self::List(values.into_iter().map(Into::into).collect())
                }
            }
        )*
    };
}

attribute_value_from!(&str, String, i64, i32, f64, bool);

impl From<Scalar> for AttributeValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<Scalar>> for AttributeValue {
    fn from(values: Vec<Scalar>) -> Self {
        Self::List(values)
    }
}

/// One entry of `!content`: literal text or a nested element
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(Scalar),
    Node(MarkupNode),
}

impl Content {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(s) => s.to_value(),
            Self::Node(node) => node.to_value(),
        }
    }

    pub fn as_node(&self) -> Option<&MarkupNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => s.as_str(),
            Self::Node(_) => None,
        }
    }
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Self::Text(value.into())
    }
}

impl From<Scalar> for Content {
    fn from(value: Scalar) -> Self {
        Self::Text(value)
    }
}

impl From<MarkupNode> for Content {
    fn from(value: MarkupNode) -> Self {
        Self::Node(value)
    }
}

/// One HTML element in array form.
///
/// Empty `attributes` and `content` are equivalent to the keys being absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct MarkupNode {
    pub element: String,
    pub attributes: Attributes,
    pub content: Vec<Content>,
}

impl MarkupNode {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_child(mut self, child: impl Into<Content>) -> Self {
        self.content.push(child.into());
        self
    }

    pub fn with_content(mut self, content: Vec<Content>) -> Self {
        self.content = content;
        self
    }

    pub fn push(&mut self, child: impl Into<Content>) {
        self.content.push(child.into());
    }

    /// Re-check the name grammar of this node (children are checked as they render)
    pub fn validate(&self) -> Result<()> {
        if !is_valid_element_name(&self.element) {
            return Err(MarkupError::ElementInvalid(self.element.clone()));
        }
        if let Some(name) = self.attributes.keys().find(|k| !is_valid_attribute_name(k)) {
            return Err(MarkupError::AttributeNameInvalid(name.clone()));
        }
        Ok(())
    }

    /// Render this node with the given options
    pub fn to_html(&self, options: &EncodeOptions) -> Result<String> {
        Serializer::new(options.clone()).serialize_node(self)
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(ELEMENT_KEY.to_string(), Value::String(self.element.clone()));
        if !self.attributes.is_empty() {
            let attrs = self
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect();
            map.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attrs));
        }
        if !self.content.is_empty() {
            let content = self.content.iter().map(Content::to_value).collect();
            map.insert(CONTENT_KEY.to_string(), Value::Array(content));
        }
        Value::Object(map)
    }
}

impl From<MarkupNode> for Value {
    fn from(node: MarkupNode) -> Self {
        node.to_value()
    }
}

impl TryFrom<Value> for MarkupNode {
    type Error = MarkupError;

    fn try_from(value: Value) -> Result<Self> {
        Self::try_from(&value)
    }
}

/// Convert a content list back into its untyped form
pub fn content_to_value(content: &[Content]) -> Value {
    Value::Array(content.iter().map(Content::to_value).collect())
}
