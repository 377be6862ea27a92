//! Document rendering tests for daft-markup-html

use daft_markup::{Content, EncodeOptions, MarkupNode};
use daft_markup_html::{Autocapitalize, Dir, Document, DocumentError, Dropzone, HtmlElement};
use pretty_assertions::assert_eq;

const MINIMAL_HEAD: &str = "<head><meta charset=\"utf-8\"><title>Test</title></head>";

fn render(doc: &Document) -> String {
    doc.to_document_string(None).unwrap()
}

fn titled() -> Document {
    let mut doc = Document::new();
    doc.set_title("Test");
    doc
}

#[test]
fn test_full_asset_document() {
    let mut doc = titled();
    doc.async_js(["./foo.js"]);
    doc.defer_js(["./bar.js", "./baz.js"]);
    doc.preload("style", ["./foo.css", "./bar.css"]);
    doc.preload("module", ["./bar-module.js"]);
    doc.configure_integrity("./foo.js", "example");
    doc.configure_integrity("./foo.css", "example-2");
    doc.include_css(["./foo.css", "./bar.css", "./baz.css"]);
    doc.exclude_css(["./baz.css"]);
    doc.cross_origin("anonymous", ["./bar.css", "./baz.css", "./foo.js"]);
    doc.append_meta("description", "Example");
    doc.include_modules(["./bar-module.js"]);
    doc.include_no_modules(["./bar-not-module.js"]);
    doc.exclude_js(["./baz.js"]);

    let expected = concat!(
        "<!DOCTYPE html>\n",
        "<html>",
        "<head>",
        "<meta charset=\"utf-8\">",
        "<title>Test</title>",
        "<link rel=\"preload\" href=\"./foo.css\" as=\"style\">",
        "<link rel=\"preload\" href=\"./bar.css\" as=\"style\" crossorigin=\"anonymous\">",
        "<link rel=\"modulepreload\" href=\"./bar-module.js\">",
        "<link rel=\"stylesheet\" href=\"./foo.css\" integrity=\"example-2\">",
        "<link rel=\"stylesheet\" href=\"./bar.css\" crossorigin=\"anonymous\">",
        "<meta name=\"description\" content=\"Example\">",
        "</head>",
        "<body>",
        "<script src=\"./foo.js\" async crossorigin=\"anonymous\" integrity=\"example\"></script>",
        "<script src=\"./bar.js\" defer></script>",
        "<script src=\"./bar-module.js\" type=\"module\"></script>",
        "<script src=\"./bar-not-module.js\" nomodule></script>",
        "</body>",
        "</html>",
    );
    assert_eq!(render(&doc), expected);
}

#[test]
fn test_html_attributes_and_preload_integrity() {
    let mut doc = titled();
    doc.set_encode_options(EncodeOptions::default());
    doc.set_charset("iso-8859-1");
    doc.append_meta("http:Refresh", "5");
    doc.preload("script", ["./foo.js"]);
    doc.configure_integrity("./foo.js", "example");
    doc.set_enable_integrity_on_preload(true);

    let attrs = doc.attributes_mut();
    attrs.set_title(Some("Toast"));
    attrs.set_lang(Some("en"));
    attrs.set_itemscope(true);
    attrs.set_hidden(true);
    attrs.set_is(Some("html-future"));
    attrs.set_id(Some("foo"));
    attrs.set_dropzone(Some(Dropzone::Copy));
    attrs.set_itemid(Some("baz"));
    attrs.set_slot(Some("nope"));
    attrs.set_itemtype(Some("http://schema.org/Thing"));
    attrs.set_dir(Some(Dir::Ltr));
    attrs.set_contextmenu(Some("bag"));
    attrs.set_contenteditable(true);
    attrs.set_autocapitalize(Some(Autocapitalize::Off));

    let expected = concat!(
        "<!DOCTYPE html>\n",
        "<html autocapitalize=\"off\" contenteditable contextmenu=\"bag\" dir=\"ltr\" ",
        "dropzone=\"copy\" hidden id=\"foo\" is=\"html-future\" itemid=\"baz\" itemscope ",
        "itemtype=\"http://schema.org/Thing\" lang=\"en\" slot=\"nope\" title=\"Toast\">",
        "<head>",
        "<meta charset=\"iso-8859-1\">",
        "<title>Test</title>",
        "<link rel=\"preload\" href=\"./foo.js\" as=\"script\" integrity=\"example\">",
        "<meta http-equiv=\"Refresh\" content=\"5\">",
        "</head>",
        "</html>",
    );
    assert_eq!(render(&doc), expected);
}

#[test]
fn test_possible_headers() {
    let mut doc = titled();
    doc.preload("script", ["./foo.js"]);
    doc.configure_integrity("./foo.js", "example");
    assert_eq!(
        doc.possible_headers(),
        ["Link: <./foo.js>; rel=preload; as=script"]
    );

    doc.set_enable_integrity_on_preload(true);
    assert_eq!(
        doc.possible_headers(),
        ["Link: <./foo.js>; rel=preload; as=script; integrity=example"]
    );

    doc.preload("module", ["./mod.js"]);
    assert_eq!(
        doc.possible_headers()[1],
        "Link: <./mod.js>; rel=modulepreload; as=module"
    );

    doc.clear_possible_header_sources();
    assert!(doc.possible_headers().is_empty());
    assert_eq!(render(&doc), format!("<!DOCTYPE html>\n<html>{MINIMAL_HEAD}</html>"));
}

#[test]
fn test_global_attributes_on_html() {
    let mut doc = titled();
    let attrs = doc.attributes_mut();
    attrs.set_data("foo", Some("bar"));
    attrs.set_tabindex(Some(-1));
    attrs.set_translate(false);
    attrs.append_class(["no-js"]);

    assert_eq!(
        render(&doc),
        format!(
            "<!DOCTYPE html>\n<html class=\"no-js\" data-foo=\"bar\" tabindex=\"-1\" translate=\"no\">{MINIMAL_HEAD}</html>"
        )
    );
}

#[test]
fn test_enumerated_booleans() {
    let cases = [
        (Some(true), "<html draggable=\"true\" spellcheck=\"true\">"),
        (Some(false), "<html draggable=\"false\" spellcheck=\"false\">"),
        (None, "<html>"),
    ];

    for (value, open_tag) in cases {
        let mut doc = titled();
        doc.attributes_mut().set_draggable(value);
        doc.attributes_mut().set_spellcheck(value);
        assert_eq!(
            render(&doc),
            format!("<!DOCTYPE html>\n{open_tag}{MINIMAL_HEAD}</html>")
        );
    }
}

#[test]
fn test_caller_content_precedes_scripts() {
    let mut doc = titled();
    doc.include_js(["./app.js"]);
    let content = vec![
        Content::from(MarkupNode::new("h1").with_child("Hello & welcome")),
        Content::from("tail"),
    ];

    assert_eq!(
        doc.to_document_string(Some(content)).unwrap(),
        format!(
            "<!DOCTYPE html>\n<html>{MINIMAL_HEAD}<body><h1>Hello &amp; welcome</h1>tail<script src=\"./app.js\"></script></body></html>"
        )
    );
}

#[test]
fn test_empty_title_is_rejected() {
    let mut doc = Document::new();
    doc.set_title("   ");
    let err = doc.to_document_string(None).unwrap_err();
    assert_eq!(err, DocumentError::EmptyTitle);
    assert_eq!(err.to_string(), "Document title must not be empty!");
}

#[test]
fn test_invalid_caller_content_is_reported() {
    let doc = titled();
    let err = doc
        .to_document_string(Some(vec![MarkupNode::new("Bad").into()]))
        .unwrap_err();
    assert_eq!(err.to_string(), "Element not valid! (Bad)");
}

#[test]
fn test_document_state_round_trips_through_serde() {
    let mut doc = titled();
    doc.include_css(["./a.css"]);
    doc.attributes_mut().set_lang(Some("en"));

    let json = serde_json::to_string(&doc).unwrap();
    let back: Document = serde_json::from_str(&json).unwrap();
    assert_eq!(back, doc);
    assert_eq!(render(&back), render(&doc));
}
