//! Object model errors

use daft_markup::MarkupError;

pub type Result<T> = std::result::Result<T, DocumentError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("Document title must not be empty!")]
    EmptyTitle,

    #[error("Unknown {attribute} keyword! ({value})")]
    UnknownKeyword { attribute: &'static str, value: String },

    #[error(transparent)]
    Markup(#[from] MarkupError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            DocumentError::EmptyTitle.to_string(),
            "Document title must not be empty!"
        );
        assert_eq!(
            DocumentError::UnknownKeyword {
                attribute: "dir",
                value: "up".into()
            }
            .to_string(),
            "Unknown dir keyword! (up)"
        );
        assert_eq!(
            DocumentError::from(MarkupError::ElementMissing).to_string(),
            "Element not specified!"
        );
    }
}
