//! Attribute Encoding
//!
//! Turns a validated attribute map into the ` name="value"` run that follows
//! a tag name.

use crate::entities::encode;
use crate::grammar::ENUMERATED_BOOLEANS;
use crate::node::{AttributeValue, Attributes, Scalar};
use crate::options::EntityFlags;

/// Render attributes in map order.
///
/// `false` drops the attribute, `true` renders it bare, lists are joined with
/// single spaces. Attribute text is escaped with the HTML5 table toggled off;
/// values never double-encode, names follow `double_encode`.
pub fn encode_attributes(
    attributes: &Attributes,
    flags: &EntityFlags,
    double_encode: bool,
) -> String {
    let flags = flags.toggle_html5();
    let mut output = String::new();

    for (name, value) in attributes {
        let text = match value {
            AttributeValue::Scalar(Scalar::Bool(false)) => continue,
            AttributeValue::Scalar(Scalar::Bool(true)) => None,
            AttributeValue::Scalar(scalar) => Some(scalar.to_markup_string()),
            AttributeValue::List(items) => Some(
                items
                    .iter()
                    .map(Scalar::to_markup_string)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        };

        output.push(' ');
        output.push_str(&encode(name, &flags, double_encode));

        if let Some(text) = text {
            output.push_str("=\"");
            output.push_str(&encode(&text, &flags, false));
            output.push('"');
        }
    }

    output
}

/// Canonical attribute form used by element builders.
///
/// Keys are sorted. `draggable`/`spellcheck` booleans become the strings
/// `"true"`/`"false"`. `translate` only survives as `"no"` (from `false`, or
/// an already canonical `"no"`); any other value is the default and is dropped.
pub fn canonicalize(attributes: Attributes) -> Attributes {
    let mut out: Attributes = attributes
        .into_iter()
        .map(|(name, value)| {
            let value = match value.as_bool() {
                Some(b) if ENUMERATED_BOOLEANS.contains(&name.as_str()) => {
                    AttributeValue::from(if b { "true" } else { "false" })
                }
                _ => value,
            };
            (name, value)
        })
        .collect();

    out.sort_keys();

    let translate_off = out
        .get("translate")
        .is_some_and(|v| v.as_bool() == Some(false) || v.as_str() == Some("no"));
    if translate_off {
        out.insert("translate".to_string(), AttributeValue::from("no"));
    } else {
        out.shift_remove("translate");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::QuoteStyle;

    fn attrs(pairs: Vec<(&str, AttributeValue)>) -> Attributes {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_boolean_values() {
        let flags = EntityFlags::default();
        let bare = attrs(vec![("contenteditable", true.into())]);
        assert_eq!(encode_attributes(&bare, &flags, false), " contenteditable");

        let omitted = attrs(vec![("contenteditable", false.into())]);
        assert_eq!(encode_attributes(&omitted, &flags, false), "");
    }

    #[test]
    fn test_list_values_join_with_spaces() {
        let style = attrs(vec![(
            "style",
            vec!["font-weight:bolder;", "font-style:italic;"].into(),
        )]);
        assert_eq!(
            encode_attributes(&style, &EntityFlags::default(), false),
            r#" style="font-weight:bolder; font-style:italic;""#
        );
    }

    #[test]
    fn test_values_use_html401_table_and_never_double_encode() {
        let flags = EntityFlags::default();
        let value = attrs(vec![("title", "a/b &amp; \"c\" 'd'".into())]);
        assert_eq!(
            encode_attributes(&value, &flags, true),
            r#" title="a/b &amp; &quot;c&quot; &#039;d&#039;""#
        );

        let flags = EntityFlags {
            quotes: QuoteStyle::Double,
            ..flags
        };
        assert_eq!(
            encode_attributes(&value, &flags, false),
            r#" title="a/b &amp; &quot;c&quot; 'd'""#
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let link = attrs(vec![
            ("rel", "preload".into()),
            ("href", "./foo.css".into()),
            ("as", "style".into()),
        ]);
        assert_eq!(
            encode_attributes(&link, &EntityFlags::default(), false),
            r#" rel="preload" href="./foo.css" as="style""#
        );
    }

    #[test]
    fn test_canonicalize() {
        let out = canonicalize(attrs(vec![
            ("title", "x".into()),
            ("draggable", true.into()),
            ("spellcheck", false.into()),
            ("translate", true.into()),
            ("hidden", true.into()),
        ]));
        let keys: Vec<_> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, ["draggable", "hidden", "spellcheck", "title"]);
        assert_eq!(out["draggable"], AttributeValue::from("true"));
        assert_eq!(out["spellcheck"], AttributeValue::from("false"));

        let out = canonicalize(attrs(vec![("translate", false.into())]));
        assert_eq!(out["translate"], AttributeValue::from("no"));
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let once = canonicalize(attrs(vec![
            ("translate", false.into()),
            ("draggable", false.into()),
            ("class", vec!["a"].into()),
        ]));
        assert_eq!(canonicalize(once.clone()), once);
    }
}
