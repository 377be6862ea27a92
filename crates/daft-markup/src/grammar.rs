//! Name Grammar
//!
//! Element and attribute name rules, plus the fixed element/attribute sets.

use regex::Regex;
use std::sync::LazyLock;

/// Keys a markup node may carry
pub const SUPPORTED_KEYS: &[&str] = &[ELEMENT_KEY, ATTRIBUTES_KEY, CONTENT_KEY];

pub const ELEMENT_KEY: &str = "!element";
pub const ATTRIBUTES_KEY: &str = "!attributes";
pub const CONTENT_KEY: &str = "!content";

/// Elements rendered without a closing tag when they have no content
pub const SELF_CLOSING_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Attributes read back as booleans when parsing
pub const BOOLEAN_ELEMENT_ATTRIBUTES: &[&str] = &[
    "contenteditable", "draggable", "hidden", "itemscope", "spellcheck",
];

/// Attributes whose boolean value is written as the string "true"/"false"
pub const ENUMERATED_BOOLEANS: &[&str] = &["draggable", "spellcheck"];

// Compile-time constant patterns; a failure here is a bug in this file.
static ELEMENT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]+[a-z0-9]*(?:-[a-z0-9]+)*(?::[a-z]+[a-z0-9]*(?:-[a-z0-9]+)*)?$")
        .unwrap_or_else(|e| panic!("BUG: invalid element name pattern: {e}"))
});

static ATTRIBUTE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]+[a-z0-9_]*(?:-[a-z0-9_]+)*(?::[a-z]+[a-z0-9_]*(?:-[a-z0-9_]+)*)?$")
        .unwrap_or_else(|e| panic!("BUG: invalid attribute name pattern: {e}"))
});

/// Check an element name: lowercase, hyphenated, one optional namespace segment
#[inline]
pub fn is_valid_element_name(name: &str) -> bool {
    ELEMENT_NAME.is_match(name)
}

/// Check an attribute name: like element names, but `_` is allowed after the first letter
#[inline]
pub fn is_valid_attribute_name(name: &str) -> bool {
    ATTRIBUTE_NAME.is_match(name)
}

#[inline]
pub fn is_self_closing(element: &str) -> bool {
    SELF_CLOSING_ELEMENTS.contains(&element)
}

#[inline]
pub fn is_boolean_attribute(name: &str) -> bool {
    BOOLEAN_ELEMENT_ATTRIBUTES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_names() {
        for name in ["br", "h1", "a-b-c-d", "svg:path", "my-el2:x-y", "custom-1"] {
            assert!(is_valid_element_name(name), "{name} should be valid");
        }
        for name in ["", " br", "br-", "BR", "1h", "a--b", "svg:", "a:b:c", "a_b", "-a"] {
            assert!(!is_valid_element_name(name), "{name:?} should be invalid");
        }
    }

    #[test]
    fn test_attribute_names() {
        for name in ["title", "data-foo", "aria-label", "xlink:href", "foo_bar", "a-_b"] {
            assert!(is_valid_attribute_name(name), "{name} should be valid");
        }
        for name in [" title ", "Title", "_a", "data-", "1a", "a::b", ""] {
            assert!(!is_valid_attribute_name(name), "{name:?} should be invalid");
        }
    }

    #[test]
    fn test_fixed_sets() {
        assert!(is_self_closing("br"));
        assert!(is_self_closing("keygen"));
        assert!(!is_self_closing("p"));
        assert!(is_boolean_attribute("itemscope"));
        assert!(!is_boolean_attribute("translate"));
    }
}
