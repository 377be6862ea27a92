//! HTML Document
//!
//! Builds a complete `<html>` tree from document state.
//!
//! Key features:
//! - Preload hints, as `<link>` elements or `Link:` response headers
//! - Stylesheets and scripts (async, defer, module, nomodule)
//! - Per-URL `crossorigin` and `integrity` settings
//! - `<meta>` entries, including `http-equiv`

use daft_markup::{Content, EncodeOptions, MarkupNode};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attributes::HtmlAttributes;
use crate::element::HtmlElement;
use crate::error::{DocumentError, Result};

const DOCTYPE: &str = "<!DOCTYPE html>";

/// One `<meta>` entry; `key` is `name` or `http-equiv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub key: String,
    pub value: String,
    pub content: String,
}

/// HTML document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    attributes: HtmlAttributes,
    title: Option<String>,
    charset: String,
    /// url -> `as` destination
    preloads: IndexMap<String, String>,
    stylesheets: Vec<String>,
    scripts: Vec<String>,
    async_scripts: Vec<String>,
    deferred_scripts: Vec<String>,
    modules: Vec<String>,
    no_modules: Vec<String>,
    metas: Vec<Meta>,
    cross_origin: IndexMap<String, String>,
    integrity: IndexMap<String, String>,
    enable_integrity_on_preload: bool,
    encode_options: EncodeOptions,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            attributes: HtmlAttributes::default(),
            title: None,
            charset: "utf-8".to_string(),
            preloads: IndexMap::new(),
            stylesheets: Vec::new(),
            scripts: Vec::new(),
            async_scripts: Vec::new(),
            deferred_scripts: Vec::new(),
            modules: Vec::new(),
            no_modules: Vec::new(),
            metas: Vec::new(),
            cross_origin: IndexMap::new(),
            integrity: IndexMap::new(),
            enable_integrity_on_preload: false,
            encode_options: EncodeOptions::default(),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document title; empty when unset
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Set the title, trimmed; a blank title unsets it
    pub fn set_title(&mut self, title: &str) {
        let title = title.trim();
        self.title = (!title.is_empty()).then(|| title.to_string());
    }

    pub fn charset(&self) -> &str {
        &self.charset
    }

    pub fn set_charset(&mut self, charset: impl Into<String>) {
        self.charset = charset.into();
    }

    pub fn encode_options(&self) -> &EncodeOptions {
        &self.encode_options
    }

    /// Serializer settings used by [`Document::to_document_string`]
    pub fn set_encode_options(&mut self, options: EncodeOptions) {
        self.encode_options = options;
    }

    pub fn enable_integrity_on_preload(&self) -> bool {
        self.enable_integrity_on_preload
    }

    pub fn set_enable_integrity_on_preload(&mut self, enabled: bool) {
        self.enable_integrity_on_preload = enabled;
    }

    /// Preload `urls` as `as_type`; `"module"` becomes a modulepreload
    pub fn preload<I, S>(&mut self, as_type: &str, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for url in urls {
            self.preloads.insert(url.into(), as_type.to_string());
        }
    }

    pub fn include_css<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        merge_unique(&mut self.stylesheets, collect_urls(urls));
    }

    pub fn exclude_css<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        exclude_urls(&mut self.stylesheets, &collect_urls(urls));
    }

    pub fn include_js<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        merge_unique(&mut self.scripts, collect_urls(urls));
    }

    pub fn defer_js<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let urls = collect_urls(urls);
        merge_unique(&mut self.scripts, urls.clone());
        merge_unique(&mut self.deferred_scripts, urls);
    }

    pub fn async_js<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let urls = collect_urls(urls);
        merge_unique(&mut self.scripts, urls.clone());
        merge_unique(&mut self.async_scripts, urls);
    }

    /// Drop scripts from the page; their async/defer/module flags are kept
    pub fn exclude_js<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        exclude_urls(&mut self.scripts, &collect_urls(urls));
    }

    pub fn include_modules<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let urls = collect_urls(urls);
        merge_unique(&mut self.scripts, urls.clone());
        merge_unique(&mut self.modules, urls);
    }

    pub fn include_no_modules<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let urls = collect_urls(urls);
        merge_unique(&mut self.scripts, urls.clone());
        merge_unique(&mut self.no_modules, urls);
    }

    pub fn cross_origin<I, S>(&mut self, setting: &str, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for url in urls {
            self.cross_origin.insert(url.into(), setting.to_string());
        }
    }

    pub fn configure_integrity(&mut self, url: impl Into<String>, integrity: impl Into<String>) {
        self.integrity.insert(url.into(), integrity.into());
    }

    /// Append a `<meta>`; a name of the form `http:X` becomes `http-equiv="X"`
    pub fn append_meta(&mut self, name: &str, content: &str) {
        let (key, value) = match name.strip_prefix("http:").filter(|v| !v.is_empty()) {
            Some(header) => ("http-equiv", header),
            None => ("name", name),
        };
        self.metas.push(Meta {
            key: key.to_string(),
            value: value.to_string(),
            content: content.to_string(),
        });
    }

    /// `Link:` headers equivalent to the preload hints
    pub fn possible_headers(&self) -> Vec<String> {
        self.preloads
            .iter()
            .map(|(url, as_type)| {
                let rel = if as_type == "module" { "modulepreload" } else { "preload" };
                let mut header = format!("Link: <{url}>; rel={rel}; as={as_type}");
                if self.enable_integrity_on_preload {
                    if let Some(integrity) = self.integrity.get(url) {
                        header.push_str("; integrity=");
                        header.push_str(integrity);
                    }
                }
                header
            })
            .collect()
    }

    /// Forget all preload hints
    pub fn clear_possible_header_sources(&mut self) {
        self.preloads.clear();
    }

    /// Render the whole document, doctype included
    pub fn to_document_string(&self, content: Option<Vec<Content>>) -> Result<String> {
        tracing::debug!("Rendering document \"{}\"", self.title());
        let node = self.to_markup_node(content)?;
        let html = node.to_html(&self.encode_options)?;
        Ok(format!("{DOCTYPE}\n{html}"))
    }

    fn head_content(&self) -> Result<Vec<Content>> {
        let Some(title) = self.title.as_deref() else {
            return Err(DocumentError::EmptyTitle);
        };

        let mut head: Vec<Content> = vec![
            MarkupNode::new("meta")
                .with_attribute("charset", self.charset.as_str())
                .into(),
            MarkupNode::new("title").with_child(title).into(),
        ];

        head.extend(self.preloads.keys().map(|url| Content::from(self.preload_link(url))));
        head.extend(self.stylesheets.iter().map(|url| Content::from(self.stylesheet_link(url))));
        head.extend(self.metas.iter().map(|meta| {
            Content::from(
                MarkupNode::new("meta")
                    .with_attribute(meta.key.as_str(), meta.value.as_str())
                    .with_attribute("content", meta.content.as_str()),
            )
        }));

        Ok(head)
    }

    fn preload_link(&self, url: &str) -> MarkupNode {
        let as_type = self.preloads.get(url).map(String::as_str).unwrap_or_default();
        let link = if as_type == "module" {
            MarkupNode::new("link")
                .with_attribute("rel", "modulepreload")
                .with_attribute("href", url)
        } else {
            MarkupNode::new("link")
                .with_attribute("rel", "preload")
                .with_attribute("href", url)
                .with_attribute("as", as_type)
        };
        self.decorate(link, url, self.enable_integrity_on_preload)
    }

    fn stylesheet_link(&self, url: &str) -> MarkupNode {
        let link = MarkupNode::new("link")
            .with_attribute("rel", "stylesheet")
            .with_attribute("href", url);
        self.decorate(link, url, true)
    }

    fn script(&self, url: &str) -> MarkupNode {
        let mut script = MarkupNode::new("script")
            .with_attribute("src", url)
            .with_attribute("async", self.async_scripts.iter().any(|u| u == url))
            .with_attribute("defer", self.deferred_scripts.iter().any(|u| u == url));

        if self.modules.iter().any(|u| u == url) {
            script = script.with_attribute("type", "module");
        } else if self.no_modules.iter().any(|u| u == url) {
            script = script.with_attribute("nomodule", true);
        }

        self.decorate(script, url, true)
    }

    fn decorate(&self, mut node: MarkupNode, url: &str, with_integrity: bool) -> MarkupNode {
        if let Some(setting) = self.cross_origin.get(url) {
            node = node.with_attribute("crossorigin", setting.as_str());
        }
        if with_integrity {
            if let Some(integrity) = self.integrity.get(url) {
                node = node.with_attribute("integrity", integrity.as_str());
            }
        }
        node
    }
}

impl HtmlElement for Document {
    fn element_name(&self) -> &'static str {
        "html"
    }

    fn attributes(&self) -> &HtmlAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut HtmlAttributes {
        &mut self.attributes
    }

    /// `<head>` always; `<body>` with the caller's content and the scripts,
    /// only when there is something to put in it
    fn to_markup_node(&self, content: Option<Vec<Content>>) -> Result<MarkupNode> {
        let head = MarkupNode::new("head").with_content(self.head_content()?);

        let mut body = content.unwrap_or_default();
        body.extend(self.scripts.iter().map(|url| Content::from(self.script(url))));

        let mut html = MarkupNode::new(self.element_name())
            .with_attributes(self.attributes.markup_attributes())
            .with_child(head);
        if !body.is_empty() {
            html.push(MarkupNode::new("body").with_content(body));
        }

        Ok(html)
    }
}

fn collect_urls<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    urls.into_iter().map(Into::into).collect()
}

/// Append urls not yet present, keeping first-seen order
fn merge_unique(list: &mut Vec<String>, urls: Vec<String>) {
    for url in urls {
        if !list.contains(&url) {
            list.push(url);
        }
    }
}

fn exclude_urls(list: &mut Vec<String>, urls: &[String]) {
    list.retain(|url| !urls.contains(url));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_trimmed() {
        let mut doc = Document::new();
        assert_eq!(doc.title(), "");
        doc.set_title("  Test ");
        assert_eq!(doc.title(), "Test");
        doc.set_title("   ");
        assert_eq!(doc.title(), "");
    }

    #[test]
    fn test_missing_title_fails() {
        let err = Document::new().to_document_string(None).unwrap_err();
        assert_eq!(err, DocumentError::EmptyTitle);
        assert_eq!(err.to_string(), "Document title must not be empty!");
    }

    #[test]
    fn test_script_lists_stay_unique() {
        let mut doc = Document::new();
        doc.include_js(["./a.js", "./b.js"]);
        doc.defer_js(["./b.js", "./c.js"]);
        doc.async_js(["./a.js"]);
        assert_eq!(doc.scripts, ["./a.js", "./b.js", "./c.js"]);
        assert_eq!(doc.deferred_scripts, ["./b.js", "./c.js"]);

        doc.exclude_js(["./b.js"]);
        assert_eq!(doc.scripts, ["./a.js", "./c.js"]);
        assert_eq!(doc.deferred_scripts, ["./b.js", "./c.js"]);
    }

    #[test]
    fn test_preload_keeps_first_position() {
        let mut doc = Document::new();
        doc.preload("style", ["./a.css", "./b.css"]);
        doc.preload("font", ["./a.css"]);
        let entries: Vec<_> = doc.preloads.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(entries, [("./a.css", "font"), ("./b.css", "style")]);
    }

    #[test]
    fn test_meta_keys() {
        let mut doc = Document::new();
        doc.append_meta("description", "Example");
        doc.append_meta("http:Refresh", "5");
        doc.append_meta("http:", "x");
        let keys: Vec<_> = doc.metas.iter().map(|m| (m.key.as_str(), m.value.as_str())).collect();
        assert_eq!(
            keys,
            [("name", "description"), ("http-equiv", "Refresh"), ("name", "http:")]
        );
    }

    #[test]
    fn test_body_is_omitted_without_content() {
        let mut doc = Document::new();
        doc.set_title("Test");
        let node = doc.to_markup_node(None).unwrap();
        assert_eq!(node.content.len(), 1);

        let node = doc.to_markup_node(Some(vec!["Hi".into()])).unwrap();
        assert_eq!(node.content.len(), 2);
        assert_eq!(node.content[1].as_node().map(|n| n.element.as_str()), Some("body"));
    }
}
