//! Conversion Options
//!
//! Serializer and parser settings. All of them deserialize with defaults
//! filled in, so a partial JSON document is a valid configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{MarkupError, Result};

/// Which quote characters get escaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// `"` and `'`
    #[default]
    Both,
    /// `"` only
    Double,
    /// Neither
    None,
}

/// Entity escaping flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityFlags {
    pub quotes: QuoteStyle,
    /// Replace invalid byte sequences with U+FFFD instead of rejecting the input
    pub substitute_invalid: bool,
    /// Use the HTML5 named entity table instead of the HTML 4.01 one
    pub html5: bool,
}

impl Default for EntityFlags {
    fn default() -> Self {
        Self {
            quotes: QuoteStyle::Both,
            substitute_invalid: true,
            html5: true,
        }
    }
}

impl EntityFlags {
    /// The same flags with the HTML5 table toggled; attributes are escaped this way
    pub fn toggle_html5(self) -> Self {
        Self {
            html5: !self.html5,
            ..self
        }
    }
}

/// Serializer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Close empty void elements with `/>`
    pub xml_style: bool,
    pub flags: EntityFlags,
    pub encoding: String,
    /// Re-escape `&` that already starts an entity reference
    pub double_encode: bool,
    /// Sort attributes and rewrite `draggable`/`spellcheck`/`translate`
    pub canonical_attributes: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            xml_style: false,
            flags: EntityFlags::default(),
            encoding: "UTF-8".to_string(),
            double_encode: false,
            canonical_attributes: false,
        }
    }
}

impl EncodeOptions {
    pub fn xml() -> Self {
        Self {
            xml_style: true,
            ..Self::default()
        }
    }

    /// Load options from a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Only UTF-8 output is produced
    pub fn check_encoding(&self) -> Result<()> {
        let label = self.encoding.trim();
        if label.eq_ignore_ascii_case("utf-8") || label.eq_ignore_ascii_case("utf8") {
            Ok(())
        } else {
            Err(MarkupError::UnsupportedEncoding(self.encoding.clone()))
        }
    }
}

/// Parse-time element and attribute filters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseFilters {
    /// Elements collapsed to their text content, keyed by tag name
    pub exclude_elements: IndexMap<String, Vec<String>>,
    /// When non-empty, only these elements survive; each entry lists the attributes kept
    pub keep_elements: IndexMap<String, Vec<String>>,
    /// When non-empty, only these attribute names survive on any element
    pub general_attr_whitelist: Vec<String>,
}

impl ParseFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn exclude(mut self, element: impl Into<String>) -> Self {
        self.exclude_elements.insert(element.into(), Vec::new());
        self
    }

    pub fn keep<I, S>(mut self, element: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attributes = attributes.into_iter().map(Into::into).collect();
        self.keep_elements.insert(element.into(), attributes);
        self
    }

    pub fn whitelist<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.general_attr_whitelist
            .extend(attributes.into_iter().map(Into::into));
        self
    }

    /// Whether an element keeps its wrapper rather than collapsing to text
    pub fn keeps_element(&self, element: &str) -> bool {
        let kept = self.keep_elements.is_empty() || self.keep_elements.contains_key(element);
        kept && !self.exclude_elements.contains_key(element)
    }

    /// Whether an attribute survives on the given element
    pub fn keeps_attribute(&self, element: &str, attribute: &str) -> bool {
        let by_element = self
            .keep_elements
            .get(element)
            .is_none_or(|allowed| allowed.iter().any(|a| a == attribute));
        let general = self.general_attr_whitelist.is_empty()
            || self.general_attr_whitelist.iter().any(|a| a == attribute);
        by_element && general
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EncodeOptions::default();
        assert!(!options.xml_style);
        assert!(!options.double_encode);
        assert_eq!(options.flags.quotes, QuoteStyle::Both);
        assert!(options.flags.html5);
        assert!(options.check_encoding().is_ok());
    }

    #[test]
    fn test_partial_json_config() {
        let json = r#"{"xml_style": true, "flags": {"quotes": "double"}}"#;
        let options = EncodeOptions::from_json(json).unwrap();
        assert!(options.xml_style);
        assert_eq!(options.flags.quotes, QuoteStyle::Double);
        assert!(options.flags.html5);
        assert_eq!(options.encoding, "UTF-8");
    }

    #[test]
    fn test_encoding_labels() {
        let mut options = EncodeOptions::default();
        options.encoding = "utf8".into();
        assert!(options.check_encoding().is_ok());
        options.encoding = "ISO-8859-1".into();
        assert_eq!(
            options.check_encoding(),
            Err(MarkupError::UnsupportedEncoding("ISO-8859-1".into()))
        );
    }

    #[test]
    fn test_filters() {
        let filters = ParseFilters::new().keep("h1", ["id"]).exclude("h1");
        assert!(!filters.keeps_element("h1"));
        assert!(!filters.keeps_element("p"));

        let filters = ParseFilters::new().keep("a", ["href"]).whitelist(["href", "title"]);
        assert!(filters.keeps_element("a"));
        assert!(filters.keeps_attribute("a", "href"));
        assert!(!filters.keeps_attribute("a", "title"));
        assert!(filters.keeps_attribute("p", "title"));
        assert!(!filters.keeps_attribute("p", "class"));
    }
}
