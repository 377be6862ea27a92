//! Markup Validation
//!
//! Runtime gate for loosely structured input. Structural checks always run
//! before attribute checks, and nothing is coerced: a bad node is reported,
//! never repaired.

use serde_json::{Map, Value};

use crate::error::{MarkupError, Result};
use crate::grammar::{
    ATTRIBUTES_KEY, CONTENT_KEY, ELEMENT_KEY, SUPPORTED_KEYS, is_valid_attribute_name,
    is_valid_element_name,
};
use crate::node::{AttributeValue, Attributes, Content, MarkupNode, Scalar};

/// Check the element name, the shape of `!content` and the key set
pub fn validate_markup(markup: &Value) -> Result<()> {
    let map = as_markup_map(markup)?;

    match map.get(ELEMENT_KEY) {
        None => return Err(MarkupError::ElementMissing),
        Some(Value::String(element)) => {
            if !is_valid_element_name(element) {
                return Err(MarkupError::ElementInvalid(element.clone()));
            }
        }
        Some(_) => return Err(MarkupError::ElementNotString),
    }

    if let Some(content) = present(map, CONTENT_KEY) {
        validate_content(content)?;
    }

    if let Some(key) = map.keys().find(|k| !SUPPORTED_KEYS.contains(&k.as_str())) {
        return Err(MarkupError::UnsupportedKey(key.clone()));
    }

    Ok(())
}

/// Validate the node, then its attributes; returns them in the caller's order
pub fn validate_attributes(markup: &Value) -> Result<Attributes> {
    validate_markup(markup)?;

    let attributes = as_markup_map(markup)
        .ok()
        .and_then(|m| present(m, ATTRIBUTES_KEY));
    let Some(attributes) = attributes else {
        return Ok(Attributes::new());
    };

    match attributes {
        Value::Object(map) => map
            .iter()
            .map(|(name, value)| -> Result<(String, AttributeValue)> {
                validate_attribute_name(name)?;
                Ok((name.clone(), validate_attribute_value(name, value)?))
            })
            .collect(),
        // A list has integer keys
        Value::Array(items) if items.is_empty() => Ok(Attributes::new()),
        Value::Array(_) => Err(MarkupError::AttributeKeyNotString),
        _ => Err(MarkupError::AttributesNotArray),
    }
}

fn validate_attribute_name(name: &str) -> Result<()> {
    if is_valid_attribute_name(name) {
        Ok(())
    } else {
        Err(MarkupError::AttributeNameInvalid(name.to_string()))
    }
}

fn validate_attribute_value(name: &str, value: &Value) -> Result<AttributeValue> {
    let members: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        scalar => {
            return Scalar::from_value(scalar)
                .map(AttributeValue::Scalar)
                .ok_or_else(|| MarkupError::AttributeValueInvalid(name.to_string()));
        }
    };

    members
        .into_iter()
        .map(|member| {
            Scalar::from_value(member)
                .ok_or_else(|| MarkupError::AttributeArrayValueInvalid(name.to_string()))
        })
        .collect::<Result<Vec<_>>>()
        .map(AttributeValue::List)
}

fn validate_content(content: &Value) -> Result<()> {
    let Value::Array(items) = content else {
        return Err(MarkupError::ContentNotArray);
    };
    if items.iter().any(Value::is_null) {
        return Err(MarkupError::ContentItemInvalid);
    }
    Ok(())
}

/// Convert one validated content item; nested nodes are validated as they convert
pub fn content_from_value(item: &Value) -> Result<Content> {
    match item {
        Value::Null => Err(MarkupError::ContentItemInvalid),
        Value::Object(_) | Value::Array(_) => MarkupNode::try_from(item).map(Content::Node),
        scalar => Scalar::from_value(scalar)
            .map(Content::Text)
            .ok_or(MarkupError::ContentItemInvalid),
    }
}

impl TryFrom<&Value> for MarkupNode {
    type Error = MarkupError;

    fn try_from(markup: &Value) -> Result<Self> {
        let attributes = validate_attributes(markup)?;
        let map = as_markup_map(markup)?;

        let element = match map.get(ELEMENT_KEY) {
            Some(Value::String(element)) => element.clone(),
            _ => return Err(MarkupError::ElementMissing),
        };

        let content = match present(map, CONTENT_KEY) {
            Some(Value::Array(items)) => items
                .iter()
                .map(content_from_value)
                .collect::<Result<Vec<_>>>()?,
            _ => Vec::new(),
        };

        Ok(Self {
            element,
            attributes,
            content,
        })
    }
}

/// Anything other than an object has no `!element` key
fn as_markup_map(markup: &Value) -> Result<&Map<String, Value>> {
    markup.as_object().ok_or(MarkupError::ElementMissing)
}

/// A key holding `null` counts as absent
fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}
