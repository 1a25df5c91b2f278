//! Resource declarations and outputs

use serde::Serialize;
use serde_json::Value;

use crate::error::{PropertyError, Result, TemplateError};
use crate::expr::Expr;
use crate::validate_logical_id;

/// Property set of one CloudFormation resource type
///
/// Implementors serialize to the `Properties` object of the resource and
/// check their own field-level rules in [`ResourceProperties::validate`].
pub trait ResourceProperties: Serialize {
    /// CloudFormation type name, e.g. `AWS::S3::Bucket`
    const RESOURCE_TYPE: &'static str;

    /// Attributes readable through `Fn::GetAtt`
    const ATTRIBUTES: &'static [&'static str] = &[];

    fn validate(&self) -> Result<(), PropertyError>;
}

/// A validated resource ready to be added to a template
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub(crate) logical_id: String,
    pub(crate) resource_type: &'static str,
    pub(crate) attributes: &'static [&'static str],
    pub(crate) properties: Value,
    pub(crate) depends_on: Vec<String>,
}

impl Resource {
    pub fn new<P: ResourceProperties>(logical_id: impl Into<String>, properties: P) -> Result<Self> {
        let logical_id = logical_id.into();
        validate_logical_id(&logical_id)?;

        properties
            .validate()
            .map_err(|source| TemplateError::InvalidProperty {
                logical_id: logical_id.clone(),
                resource_type: P::RESOURCE_TYPE,
                source,
            })?;

        Ok(Self {
            logical_id,
            resource_type: P::RESOURCE_TYPE,
            attributes: P::ATTRIBUTES,
            properties: serde_json::to_value(&properties)?,
            depends_on: Vec::new(),
        })
    }

    /// Require `target` to be created before this resource
    pub fn depends_on(mut self, target: impl Into<String>) -> Self {
        let target = target.into();
        if !self.depends_on.contains(&target) {
            self.depends_on.push(target);
        }
        self
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    pub fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.contains(&attribute)
    }

    pub(crate) fn to_value(&self) -> Value {
        let mut entry = serde_json::Map::new();
        entry.insert("Type".to_string(), Value::from(self.resource_type));
        if self.properties.as_object().is_some_and(|p| !p.is_empty()) {
            entry.insert("Properties".to_string(), self.properties.clone());
        }
        if !self.depends_on.is_empty() {
            entry.insert(
                "DependsOn".to_string(),
                Value::from(self.depends_on.clone()),
            );
        }
        Value::Object(entry)
    }
}

/// A value exported from the stack once it is created
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: Expr,
}

impl Output {
    pub fn new(value: impl Into<Expr>) -> Self {
        Self {
            description: None,
            value: value.into(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
