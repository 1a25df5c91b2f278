// s3-lambda-stack-template - Typed CloudFormation template model
//
// Declarations are checked as they are added (logical ids, required
// properties, enumerated values) and the whole graph is checked for dangling
// references before it is rendered. Nothing here performs I/O.

use std::collections::BTreeMap;

use tracing::debug;

mod error;
mod expr;
mod parameter;
mod render;
mod resource;
mod validation;

pub mod iam;
pub mod lambda;
pub mod s3;

pub use error::{PropertyError, Result, TemplateError};
pub use expr::{pseudo, Expr};
pub use parameter::{Parameter, ParameterType};
pub use render::Format;
pub use resource::{Output, Resource, ResourceProperties};

pub const FORMAT_VERSION: &str = "2010-09-09";

pub const MAX_PARAMETERS: usize = 200;
pub const MAX_RESOURCES: usize = 500;
pub const MAX_OUTPUTS: usize = 200;
pub const MAX_DESCRIPTION_BYTES: usize = 1024;
const MAX_LOGICAL_ID_LEN: usize = 255;

/// Template root: accumulates declarations until rendered
#[derive(Debug, Clone, Default)]
pub struct Template {
    description: Option<String>,
    parameters: BTreeMap<String, Parameter>,
    resources: BTreeMap<String, Resource>,
    outputs: BTreeMap<String, Output>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        let description = description.into();
        if description.len() > MAX_DESCRIPTION_BYTES {
            return Err(TemplateError::DescriptionTooLong {
                len: description.len(),
                max: MAX_DESCRIPTION_BYTES,
            });
        }
        self.description = Some(description);
        Ok(())
    }

    /// Declare a parameter and get a `Ref` to it
    pub fn add_parameter(&mut self, parameter: Parameter) -> Result<Expr> {
        let id = parameter.logical_id().to_string();
        validate_logical_id(&id)?;
        if self.parameters.contains_key(&id) || self.resources.contains_key(&id) {
            return Err(TemplateError::DuplicateLogicalId {
                section: "parameter",
                id,
            });
        }
        if self.parameters.len() >= MAX_PARAMETERS {
            return Err(TemplateError::LimitExceeded {
                section: "parameters",
                max: MAX_PARAMETERS,
            });
        }
        parameter.validate()?;

        debug!(parameter = %id, kind = %parameter.kind, "Declared parameter");
        self.parameters.insert(id.clone(), parameter);
        Ok(Expr::Ref(id))
    }

    /// Declare a resource and get a `Ref` to it
    pub fn add_resource(&mut self, resource: Resource) -> Result<Expr> {
        let id = resource.logical_id().to_string();
        if self.resources.contains_key(&id) || self.parameters.contains_key(&id) {
            return Err(TemplateError::DuplicateLogicalId {
                section: "resource",
                id,
            });
        }
        if self.resources.len() >= MAX_RESOURCES {
            return Err(TemplateError::LimitExceeded {
                section: "resources",
                max: MAX_RESOURCES,
            });
        }

        debug!(resource = %id, resource_type = resource.resource_type(), "Declared resource");
        self.resources.insert(id.clone(), resource);
        Ok(Expr::Ref(id))
    }

    pub fn add_output(&mut self, logical_id: impl Into<String>, output: Output) -> Result<()> {
        let id = logical_id.into();
        validate_logical_id(&id)?;
        if self.outputs.contains_key(&id) {
            return Err(TemplateError::DuplicateLogicalId {
                section: "output",
                id,
            });
        }
        if self.outputs.len() >= MAX_OUTPUTS {
            return Err(TemplateError::LimitExceeded {
                section: "outputs",
                max: MAX_OUTPUTS,
            });
        }

        debug!(output = %id, "Declared output");
        self.outputs.insert(id, output);
        Ok(())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn parameter(&self, logical_id: &str) -> Option<&Parameter> {
        self.parameters.get(logical_id)
    }

    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    pub fn parameter_ids(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    pub fn resource_ids(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn output_ids(&self) -> impl Iterator<Item = &str> {
        self.outputs.keys().map(String::as_str)
    }
}

pub(crate) fn validate_logical_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > MAX_LOGICAL_ID_LEN || !id.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(TemplateError::InvalidLogicalId { id: id.to_string() });
    }
    Ok(())
}
