//! Daft Markup HTML
//!
//! Typed HTML elements on top of `daft-markup`: global attribute storage
//! and a document builder that renders a full page.

mod attributes;
mod document;
mod element;
mod error;

pub use attributes::{Autocapitalize, Dir, Dropzone, HtmlAttributes};
pub use document::{Document, Meta};
pub use element::HtmlElement;
pub use error::{DocumentError, Result};
