//! HTML Global Attributes
//!
//! Storage and typed accessors for the attributes every HTML element
//! accepts, plus microdata and `tabindex`.
//!
//! Values live in three groups:
//! - nullable strings (`id`, `lang`, `data-*`, ...)
//! - string lists (`class`, `style`, `accesskey`, `itemref`)
//! - nullable booleans (`hidden`, `draggable`, `translate`, ...)
//!
//! [`HtmlAttributes::markup_attributes`] flattens them into the canonical
//! markup form: keys sorted, enumerated booleans spelled out, `translate`
//! only present when switched off.

use std::fmt;
use std::str::FromStr;

use daft_markup::attributes::canonicalize;
use daft_markup::{AttributeValue, Attributes};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, Result};

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $attribute:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = DocumentError;

            fn from_str(value: &str) -> Result<Self> {
                match value {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(DocumentError::UnknownKeyword {
                        attribute: $attribute,
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

keyword_enum! {
    /// `autocapitalize` keywords
    Autocapitalize, "autocapitalize" {
        Off => "off",
        None => "none",
        On => "on",
        Sentences => "sentences",
        Words => "words",
        Characters => "characters",
    }
}

keyword_enum! {
    /// Text direction
    Dir, "dir" {
        Ltr => "ltr",
        Rtl => "rtl",
        Auto => "auto",
    }
}

keyword_enum! {
    /// `dropzone` operation
    Dropzone, "dropzone" {
        Copy => "copy",
        Move => "move",
        Link => "link",
    }
}

macro_rules! string_attributes {
    ($($get:ident, $set:ident => $name:literal;)+) => {
        $(
            pub fn $get(&self) -> Option<&str> {
                self.string($name)
            }

            pub fn $set(&mut self, value: Option<&str>) {
                self.set_string($name, value);
            }
        )+
    };
}

macro_rules! list_attributes {
    ($($get:ident, $set:ident, $append:ident, $clear:ident => $name:literal;)+) => {
        $(
            pub fn $get(&self) -> &[String] {
                self.list($name)
            }

            pub fn $set<I, S>(&mut self, values: I)
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.set_list($name, values);
            }

            pub fn $append<I, S>(&mut self, values: I)
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.append_list($name, values);
            }

            pub fn $clear(&mut self) {
                self.clear_list($name);
            }
        )+
    };
}

/// Global attribute set of an HTML element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlAttributes {
    strings: IndexMap<String, String>,
    lists: IndexMap<String, Vec<String>>,
    booleans: IndexMap<String, bool>,
    tabindex: Option<i64>,
}

impl Default for HtmlAttributes {
    fn default() -> Self {
        let mut booleans = IndexMap::new();
        booleans.insert("translate".to_string(), true);
        Self {
            strings: IndexMap::new(),
            lists: IndexMap::new(),
            booleans,
            tabindex: None,
        }
    }
}

impl HtmlAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nullable string attribute by name
    pub fn string(&self, name: &str) -> Option<&str> {
        self.strings.get(name).map(String::as_str)
    }

    /// Set or, with `None`, remove a string attribute
    pub fn set_string(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.strings.insert(name.to_string(), value.to_string());
            }
            None => {
                self.strings.shift_remove(name);
            }
        }
    }

    /// String list attribute; empty when unset
    pub fn list(&self, name: &str) -> &[String] {
        self.lists.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn set_list<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.lists.insert(name.to_string(), values);
    }

    pub fn append_list<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists
            .entry(name.to_string())
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    pub fn clear_list(&mut self, name: &str) {
        self.lists.shift_remove(name);
    }

    /// Boolean attribute; unset reads as `false`
    pub fn boolean(&self, name: &str) -> bool {
        self.booleans.get(name).copied().unwrap_or(false)
    }

    /// Set or, with `None`, unset a boolean attribute
    pub fn set_boolean(&mut self, name: &str, value: Option<bool>) {
        match value {
            Some(value) => {
                self.booleans.insert(name.to_string(), value);
            }
            None => {
                self.booleans.shift_remove(name);
            }
        }
    }

    string_attributes! {
        contextmenu, set_contextmenu => "contextmenu";
        id, set_id => "id";
        is, set_is => "is";
        lang, set_lang => "lang";
        slot, set_slot => "slot";
        title, set_title => "title";
        itemid, set_itemid => "itemid";
        itemtype, set_itemtype => "itemtype";
    }

    list_attributes! {
        accesskey, set_accesskey, append_accesskey, clear_accesskey => "accesskey";
        class, set_class, append_class, clear_class => "class";
        style, set_style, append_style, clear_style => "style";
        itemref, set_itemref, append_itemref, clear_itemref => "itemref";
    }

    pub fn autocapitalize(&self) -> Option<Autocapitalize> {
        self.string("autocapitalize").and_then(|v| v.parse().ok())
    }

    pub fn set_autocapitalize(&mut self, value: Option<Autocapitalize>) {
        self.set_string("autocapitalize", value.map(Autocapitalize::as_str));
    }

    pub fn dir(&self) -> Option<Dir> {
        self.string("dir").and_then(|v| v.parse().ok())
    }

    pub fn set_dir(&mut self, value: Option<Dir>) {
        self.set_string("dir", value.map(Dir::as_str));
    }

    pub fn dropzone(&self) -> Option<Dropzone> {
        self.string("dropzone").and_then(|v| v.parse().ok())
    }

    pub fn set_dropzone(&mut self, value: Option<Dropzone>) {
        self.set_string("dropzone", value.map(Dropzone::as_str));
    }

    pub fn contenteditable(&self) -> bool {
        self.boolean("contenteditable")
    }

    pub fn set_contenteditable(&mut self, value: bool) {
        self.set_boolean("contenteditable", Some(value));
    }

    pub fn draggable(&self) -> bool {
        self.boolean("draggable")
    }

    /// `None` leaves the browser default in place
    pub fn set_draggable(&mut self, value: Option<bool>) {
        self.set_boolean("draggable", value);
    }

    pub fn hidden(&self) -> bool {
        self.boolean("hidden")
    }

    pub fn set_hidden(&mut self, value: bool) {
        self.set_boolean("hidden", Some(value));
    }

    pub fn itemscope(&self) -> bool {
        self.boolean("itemscope")
    }

    pub fn set_itemscope(&mut self, value: bool) {
        self.set_boolean("itemscope", Some(value));
    }

    pub fn spellcheck(&self) -> bool {
        self.boolean("spellcheck")
    }

    /// `None` leaves the browser default in place
    pub fn set_spellcheck(&mut self, value: Option<bool>) {
        self.set_boolean("spellcheck", value);
    }

    pub fn translate(&self) -> bool {
        self.boolean("translate")
    }

    pub fn set_translate(&mut self, value: bool) {
        self.set_boolean("translate", Some(value));
    }

    pub fn tabindex(&self) -> Option<i64> {
        self.tabindex
    }

    pub fn set_tabindex(&mut self, value: Option<i64>) {
        self.tabindex = value;
    }

    /// `data-{name}` attribute
    pub fn data(&self, name: &str) -> Option<&str> {
        self.string(&format!("data-{name}"))
    }

    pub fn set_data(&mut self, name: &str, value: Option<&str>) {
        self.set_string(&format!("data-{name}"), value);
    }

    /// Canonical markup attributes for rendering
    pub fn markup_attributes(&self) -> Attributes {
        let mut out = Attributes::new();

        for (name, value) in &self.strings {
            out.insert(name.clone(), AttributeValue::from(value.as_str()));
        }
        for (name, values) in &self.lists {
            out.insert(name.clone(), AttributeValue::from(values.clone()));
        }
        for (name, value) in &self.booleans {
            out.insert(name.clone(), AttributeValue::from(*value));
        }
        if let Some(tabindex) = self.tabindex {
            out.insert("tabindex".to_string(), AttributeValue::from(tabindex));
        }

        canonicalize(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let attrs = HtmlAttributes::new();
        assert!(attrs.accesskey().is_empty());
        assert!(attrs.class().is_empty());
        assert_eq!(attrs.autocapitalize(), None);
        assert_eq!(attrs.dir(), None);
        assert_eq!(attrs.id(), None);
        assert_eq!(attrs.tabindex(), None);
        assert!(!attrs.draggable());
        assert!(!attrs.hidden());
        assert!(attrs.translate());
        assert!(attrs.markup_attributes().is_empty());
    }

    #[test]
    fn test_list_methods() {
        let mut attrs = HtmlAttributes::new();
        attrs.set_class(["b", "c", "d"]);
        assert_eq!(attrs.class(), ["b", "c", "d"]);

        attrs.append_class(["a", "e"]);
        assert_eq!(attrs.class(), ["b", "c", "d", "a", "e"]);

        let mut sorted = attrs.class().to_vec();
        sorted.sort();
        assert_eq!(attrs.class(), ["b", "c", "d", "a", "e"]);
        attrs.set_class(sorted);
        assert_eq!(attrs.class(), ["a", "b", "c", "d", "e"]);

        attrs.clear_class();
        assert!(attrs.class().is_empty());
    }

    #[test]
    fn test_nullable_booleans() {
        let mut attrs = HtmlAttributes::new();
        attrs.set_draggable(Some(true));
        assert!(attrs.draggable());
        assert_eq!(attrs.markup_attributes()["draggable"], AttributeValue::from("true"));

        attrs.set_draggable(Some(false));
        assert_eq!(attrs.markup_attributes()["draggable"], AttributeValue::from("false"));

        attrs.set_draggable(None);
        assert!(!attrs.draggable());
        assert!(attrs.markup_attributes().get("draggable").is_none());
    }

    #[test]
    fn test_data_attributes() {
        let mut attrs = HtmlAttributes::new();
        attrs.set_data("foo", Some("bar"));
        assert_eq!(attrs.data("foo"), Some("bar"));
        assert_eq!(attrs.string("data-foo"), Some("bar"));
        attrs.set_data("foo", None);
        assert_eq!(attrs.data("foo"), None);
    }

    #[test]
    fn test_keywords() {
        let mut attrs = HtmlAttributes::new();
        attrs.set_dir(Some(Dir::Rtl));
        attrs.set_dropzone(Some(Dropzone::Copy));
        attrs.set_autocapitalize(Some(Autocapitalize::Words));
        assert_eq!(attrs.dir(), Some(Dir::Rtl));
        assert_eq!(attrs.string("dropzone"), Some("copy"));
        assert_eq!(attrs.autocapitalize(), Some(Autocapitalize::Words));

        assert_eq!("sentences".parse::<Autocapitalize>().unwrap(), Autocapitalize::Sentences);
        assert!("up".parse::<Dir>().is_err());
    }

    #[test]
    fn test_markup_attributes_are_canonical() {
        let mut attrs = HtmlAttributes::new();
        attrs.set_data("foo", Some("bar"));
        attrs.set_tabindex(Some(-1));
        attrs.set_translate(false);
        attrs.append_class(["no-js"]);

        let markup = attrs.markup_attributes();
        let keys: Vec<_> = markup.keys().map(String::as_str).collect();
        assert_eq!(keys, ["class", "data-foo", "tabindex", "translate"]);
        assert_eq!(markup["tabindex"], AttributeValue::from(-1));
        assert_eq!(markup["translate"], AttributeValue::from("no"));
    }
}
