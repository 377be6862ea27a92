//! Markup Errors
//!
//! Every failure is raised before any output is produced.

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, MarkupError>;

/// Validation and conversion error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("Element not specified!")]
    ElementMissing,

    #[error("Element not specified as string!")]
    ElementNotString,

    #[error("Element not valid! ({0})")]
    ElementInvalid(String),

    #[error("Unsupported array key! ({0})")]
    UnsupportedKey(String),

    #[error("Attributes not specified as an array!")]
    AttributesNotArray,

    #[error("Attribute keys must be strings!")]
    AttributeKeyNotString,

    #[error("Attribute name invalid! ({0})")]
    AttributeNameInvalid(String),

    #[error("Attribute {0} contained non-scalar array value!")]
    AttributeArrayValueInvalid(String),

    #[error("Attribute {0} contained non-scalar value!")]
    AttributeValueInvalid(String),

    #[error("Element content must be specified as an array!")]
    ContentNotArray,

    #[error("Element content must be scalar or an array!")]
    ContentItemInvalid,

    #[error("Node type not supported! ({0})")]
    UnsupportedNodeType(String),

    #[error("Unsupported encoding! ({0})")]
    UnsupportedEncoding(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_offending_value() {
        assert_eq!(
            MarkupError::ElementInvalid("br-".into()).to_string(),
            "Element not valid! (br-)"
        );
        assert_eq!(
            MarkupError::AttributeNameInvalid(" title ".into()).to_string(),
            "Attribute name invalid! ( title )"
        );
        assert_eq!(
            MarkupError::AttributeArrayValueInvalid("style".into()).to_string(),
            "Attribute style contained non-scalar array value!"
        );
    }
}
