//! Conversion tests for daft-markup
//!
//! Markup arrays to HTML and back, through the crate-level entry points.

use daft_markup::{
    EncodeOptions, EntityFlags, MarkupError, MarkupNode, ParseFilters, QuoteStyle,
    content_to_value, markup_array_to_string, markup_collection_to_string, markup_string_to_array,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn to_html(markup: Value) -> String {
    markup_array_to_string(&markup, &EncodeOptions::default()).unwrap()
}

fn to_array(html: &str) -> Value {
    content_to_value(&markup_string_to_array(html, &ParseFilters::default()).unwrap())
}

// ============================================================================
// ARRAY TO STRING
// ============================================================================

#[test]
fn test_self_closing_element() {
    assert_eq!(to_html(json!({"!element": "br"})), "<br>");
    let xml = EncodeOptions::xml();
    assert_eq!(
        markup_array_to_string(&json!({"!element": "br"}), &xml).unwrap(),
        "<br/>"
    );
}

#[test]
fn test_heading_with_attributes_and_content() {
    assert_eq!(
        to_html(json!({
            "!element": "h1",
            "!attributes": {"tabindex": 0},
            "!content": ["Foo"],
        })),
        r#"<h1 tabindex="0">Foo</h1>"#
    );
}

#[test]
fn test_nested_content() {
    assert_eq!(
        to_html(json!({
            "!element": "h1",
            "!attributes": {
                "class": ["foo", "bar"],
                "style": ["font-weight:bolder;"],
                "contenteditable": true,
                "hidden": false,
            },
            "!content": [
                "Foo ",
                {"!element": "strong", "!content": ["Bar"]},
                {"!element": "br"},
            ],
        })),
        concat!(
            r#"<h1 class="foo bar" style="font-weight:bolder;" contenteditable>"#,
            "Foo <strong>Bar</strong><br></h1>",
        )
    );
}

#[test]
fn test_collection_of_paragraphs() {
    let items = vec![
        json!({"!element": "p"}),
        json!({"!element": "p", "!content": [{"!element": "p"}]}),
        json!({"!element": "p"}),
    ];
    assert_eq!(
        markup_collection_to_string(&items, &EncodeOptions::default()).unwrap(),
        "<p></p><p><p></p></p><p></p>"
    );
}

#[test]
fn test_collection_does_not_double_encode() {
    let options = EncodeOptions::default();
    assert_eq!(markup_collection_to_string(&[json!("&")], &options).unwrap(), "&amp;");
    assert_eq!(markup_collection_to_string(&[json!("&amp;")], &options).unwrap(), "&amp;");
}

#[test]
fn test_collection_uses_html5_names() {
    let options = EncodeOptions::default();
    assert_eq!(
        markup_collection_to_string(&[json!("\u{2713}")], &options).unwrap(),
        "&check;"
    );
    assert_eq!(
        markup_collection_to_string(&[json!("&check;")], &options).unwrap(),
        "&check;"
    );
}

#[test]
fn test_collection_double_encode_option() {
    let options = EncodeOptions {
        double_encode: true,
        ..EncodeOptions::default()
    };
    assert_eq!(
        markup_collection_to_string(&[json!("&amp;")], &options).unwrap(),
        "&amp;amp&semi;"
    );
}

#[test]
fn test_collection_skips_null_and_renders_numbers() {
    let items = vec![json!("a"), Value::Null, json!(1), json!(2.5)];
    assert_eq!(
        markup_collection_to_string(&items, &EncodeOptions::default()).unwrap(),
        "a12&period;5"
    );
}

#[test]
fn test_quote_styles() {
    let markup = json!({"!element": "p", "!content": ["\"a\" 'b'"]});

    assert_eq!(to_html(markup.clone()), "<p>&quot;a&quot; &apos;b&apos;</p>");

    let options = EncodeOptions {
        flags: EntityFlags {
            quotes: QuoteStyle::None,
            ..EntityFlags::default()
        },
        ..EncodeOptions::default()
    };
    assert_eq!(
        markup_array_to_string(&markup, &options).unwrap(),
        "<p>\"a\" 'b'</p>"
    );
}

#[test]
fn test_custom_and_namespaced_elements() {
    assert_eq!(to_html(json!({"!element": "a-b-c-d"})), "<a-b-c-d></a-b-c-d>");
    assert_eq!(
        to_html(json!({"!element": "svg:path", "!attributes": {"xlink:href": "#a"}})),
        r##"<svg:path xlink:href="#a"></svg:path>"##
    );
}

#[test]
fn test_failure_produces_no_output() {
    let markup = json!({
        "!element": "div",
        "!content": [{"!element": "p", "!attributes": {"bad name": 1}}],
    });
    let err = markup_array_to_string(&markup, &EncodeOptions::default()).unwrap_err();
    assert_eq!(err, MarkupError::AttributeNameInvalid("bad name".into()));
}

#[test]
fn test_error_messages() {
    let cases = [
        (json!({"!element": 1}), "Element not specified as string!"),
        (json!({"!element": "p", "!attrs": []}), "Unsupported array key! (!attrs)"),
        (json!({"!element": "p", "!attributes": "x"}), "Attributes not specified as an array!"),
        (json!({"!element": "p", "!attributes": ["x"]}), "Attribute keys must be strings!"),
        (
            json!({"!element": "p", "!attributes": {"title": null}}),
            "Attribute title contained non-scalar value!",
        ),
        (
            json!({"!element": "p", "!content": "x"}),
            "Element content must be specified as an array!",
        ),
        (
            json!({"!element": "p", "!content": [null]}),
            "Element content must be scalar or an array!",
        ),
    ];

    for (markup, message) in cases {
        let err = markup_array_to_string(&markup, &EncodeOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn test_unsupported_encoding_message() {
    let options = EncodeOptions {
        encoding: "Shift_JIS".into(),
        ..EncodeOptions::default()
    };
    let err = markup_array_to_string(&json!({"!element": "p"}), &options).unwrap_err();
    assert_eq!(err, MarkupError::UnsupportedEncoding("Shift_JIS".into()));
    assert_eq!(err.to_string(), "Unsupported encoding! (Shift_JIS)");
}

#[test]
fn test_options_from_json() {
    let options = EncodeOptions::from_json(r#"{"xml_style": true}"#).unwrap();
    assert_eq!(
        markup_array_to_string(&json!({"!element": "hr"}), &options).unwrap(),
        "<hr/>"
    );
}

// ============================================================================
// STRING TO ARRAY
// ============================================================================

#[test]
fn test_parse_self_closing() {
    assert_eq!(to_array("<br/>"), json!([{"!element": "br"}]));
    assert_eq!(to_array("<br>"), json!([{"!element": "br"}]));
}

#[test]
fn test_parse_self_closing_with_spaces() {
    assert_eq!(to_array("<br     />"), json!([{"!element": "br"}]));
}

#[test]
fn test_parse_text() {
    assert_eq!(to_array("&"), json!(["&"]));
    assert_eq!(to_array("a &amp; b"), json!(["a & b"]));
}

#[test]
fn test_parse_attribute_values_stay_strings() {
    assert_eq!(
        to_array(r#"<h1 tabindex="0">Foo</h1>"#),
        json!([{"!element": "h1", "!attributes": {"tabindex": "0"}, "!content": ["Foo"]}])
    );
}

#[test]
fn test_parse_boolean_attributes() {
    assert_eq!(
        to_array(r#"<div hidden contenteditable="false"></div>"#),
        json!([{"!element": "div", "!attributes": {"hidden": true, "contenteditable": false}}])
    );
}

#[test]
fn test_parse_keep_list_collapses_other_elements() {
    let filters = ParseFilters::new().keep("p", ["class"]);
    let content = markup_string_to_array(
        r#"<p class="x" id="y">a<strong>b</strong>c</p>"#,
        &filters,
    )
    .unwrap();
    assert_eq!(
        content_to_value(&content),
        json!([{"!element": "p", "!attributes": {"class": "x"}, "!content": ["a", "b", "c"]}])
    );
}

#[test]
fn test_parse_keep_list_without_attributes_strips_them() {
    let filters = ParseFilters::new().keep("h1", Vec::<String>::new());
    let content = markup_string_to_array(r#"<h1 id="top">Title</h1>"#, &filters).unwrap();
    assert_eq!(
        content_to_value(&content),
        json!([{"!element": "h1", "!content": ["Title"]}])
    );
}

#[test]
fn test_parse_keep_list_drops_boolean_attribute() {
    let filters = ParseFilters::new().keep("h1", Vec::<String>::new());
    let html = "<h1 contenteditable>&quot;Foo&quot;</h1>";
    let content = markup_string_to_array(html, &filters).unwrap();
    assert_eq!(
        content_to_value(&content),
        json!([{"!element": "h1", "!content": ["\"Foo\""]}])
    );
}

#[test]
fn test_parse_excluded_element_collapses_to_text() {
    let filters = ParseFilters::new().exclude("strong");
    let content = markup_string_to_array("<h1><strong>Bar</strong></h1>", &filters).unwrap();
    assert_eq!(
        content_to_value(&content),
        json!([{"!element": "h1", "!content": ["Bar"]}])
    );
}

#[test]
fn test_parse_general_whitelist() {
    let filters = ParseFilters::new().whitelist(["href"]);
    let content = markup_string_to_array(
        r#"<a href="/x" onclick="evil()">x</a>"#,
        &filters,
    )
    .unwrap();
    assert_eq!(
        content_to_value(&content),
        json!([{"!element": "a", "!attributes": {"href": "/x"}, "!content": ["x"]}])
    );
}

#[test]
fn test_parse_filters_from_json() {
    let filters = ParseFilters::from_json(r#"{"exclude_elements": {"em": []}}"#).unwrap();
    let content = markup_string_to_array("<p>a<em>b</em></p>", &filters).unwrap();
    assert_eq!(
        content_to_value(&content),
        json!([{"!element": "p", "!content": ["a", "b"]}])
    );
}

#[test]
fn test_parse_rejects_comments() {
    let err = markup_string_to_array("<!-- x -->", &ParseFilters::default()).unwrap_err();
    assert_eq!(err.to_string(), "Node type not supported! (comment)");
}

#[test]
fn test_round_trip_through_typed_nodes() {
    let html = r#"<ul class="list"><li>One</li><li>Two &amp; three</li></ul>"#;
    let content = markup_string_to_array(html, &ParseFilters::default()).unwrap();
    let node = content[0].as_node().unwrap();
    assert_eq!(node.element, "ul");
    assert_eq!(node.to_html(&EncodeOptions::default()).unwrap(), html);

    let rebuilt = MarkupNode::new("ul")
        .with_attribute("class", "list")
        .with_child(MarkupNode::new("li").with_child("One"))
        .with_child(MarkupNode::new("li").with_child("Two & three"));
    assert_eq!(node, &rebuilt);
}
