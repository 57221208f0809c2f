//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent a structurally unsound Configurable Model.
/// Recoverable anomalies (missing references, bad bounds, no default
/// language) are not errors; they are reported inline by the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unexpected root element: expected <ConfigurableModel>, found <{0}>")]
    UnexpectedRoot(String),

    #[error("missing <{element}> in {context}")]
    MissingElement { element: String, context: String },

    #[error("missing attribute '{attribute}' on <{element}> in {context}")]
    MissingAttribute {
        element: String,
        attribute: String,
        context: String,
    },
}

impl DomainError {
    pub fn missing_element(element: &str, context: impl Into<String>) -> Self {
        Self::MissingElement {
            element: element.to_string(),
            context: context.into(),
        }
    }

    pub fn missing_attribute(element: &str, attribute: &str, context: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
            context: context.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
