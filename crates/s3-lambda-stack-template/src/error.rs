//! Error types for template construction and rendering

use thiserror::Error;

/// A single property of a resource failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct PropertyError {
    pub field: &'static str,
    pub reason: String,
}

impl PropertyError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    pub fn missing(field: &'static str) -> Self {
        Self::new(field, "required value is missing or empty")
    }
}

/// Errors raised while declaring or rendering a template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Logical ids must be ASCII alphanumeric and at most 255 characters
    #[error("Invalid logical id '{id}': must be 1-255 ASCII alphanumeric characters")]
    InvalidLogicalId { id: String },

    #[error("Duplicate {section} logical id '{id}'")]
    DuplicateLogicalId { section: &'static str, id: String },

    #[error("Too many {section}: at most {max} allowed")]
    LimitExceeded { section: &'static str, max: usize },

    #[error("Description is {len} bytes; at most {max} allowed")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("Invalid property on {resource_type} '{logical_id}': {source}")]
    InvalidProperty {
        logical_id: String,
        resource_type: &'static str,
        #[source]
        source: PropertyError,
    },

    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },

    #[error("'{from}' references undeclared name '{target}'")]
    DanglingRef { from: String, target: String },

    #[error("'{from}' reads attribute '{attribute}' of undeclared resource '{resource}'")]
    UnknownGetAttResource {
        from: String,
        resource: String,
        attribute: String,
    },

    #[error("'{from}' reads attribute '{attribute}' which {resource_type} '{resource}' does not expose")]
    UnknownAttribute {
        from: String,
        resource: String,
        resource_type: String,
        attribute: String,
    },

    #[error("Resource '{from}' depends on undeclared resource '{target}'")]
    DanglingDependency { from: String, target: String },

    #[error("Resource '{id}' depends on itself")]
    SelfDependency { id: String },

    #[error("Template declares no resources")]
    NoResources,

    #[error("Failed to serialize template as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize template as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Rendered template is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub type Result<T, E = TemplateError> = std::result::Result<T, E>;
