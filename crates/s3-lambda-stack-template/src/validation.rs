// Referential integrity
//
// Walks the serialized property tree of every resource and output so any
// resource type participates without knowing its shape.

use serde_json::Value;

use crate::error::{Result, TemplateError};
use crate::expr::pseudo;
use crate::Template;

impl Template {
    /// Check that every `Ref`, `Fn::GetAtt` and `DependsOn` resolves
    pub fn validate(&self) -> Result<()> {
        if self.resources.is_empty() {
            return Err(TemplateError::NoResources);
        }

        for (id, resource) in &self.resources {
            self.check_references(id, &resource.properties)?;

            if resource.depends_on.iter().any(|target| target == id) {
                return Err(TemplateError::SelfDependency { id: id.clone() });
            }
            if let Some(target) = resource
                .depends_on
                .iter()
                .find(|target| !self.resources.contains_key(target.as_str()))
            {
                return Err(TemplateError::DanglingDependency {
                    from: id.clone(),
                    target: target.clone(),
                });
            }
        }

        for (id, output) in &self.outputs {
            self.check_references(id, &serde_json::to_value(output)?)?;
        }

        Ok(())
    }

    fn check_references(&self, from: &str, value: &Value) -> Result<()> {
        match value {
            Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(Value::String(target)) = map.get("Ref") {
                        self.check_ref(from, target)?;
                    }
                    if let Some(Value::Array(args)) = map.get("Fn::GetAtt") {
                        if let [Value::String(resource), Value::String(attribute)] = args.as_slice()
                        {
                            self.check_get_att(from, resource, attribute)?;
                        }
                    }
                }
                map.values()
                    .try_for_each(|nested| self.check_references(from, nested))
            }
            Value::Array(items) => items
                .iter()
                .try_for_each(|nested| self.check_references(from, nested)),
            _ => Ok(()),
        }
    }

    fn check_ref(&self, from: &str, target: &str) -> Result<()> {
        if pseudo::is_pseudo(target)
            || self.parameters.contains_key(target)
            || self.resources.contains_key(target)
        {
            return Ok(());
        }
        Err(TemplateError::DanglingRef {
            from: from.to_string(),
            target: target.to_string(),
        })
    }

    fn check_get_att(&self, from: &str, resource: &str, attribute: &str) -> Result<()> {
        let Some(target) = self.resources.get(resource) else {
            return Err(TemplateError::UnknownGetAttResource {
                from: from.to_string(),
                resource: resource.to_string(),
                attribute: attribute.to_string(),
            });
        };
        if !target.has_attribute(attribute) {
            return Err(TemplateError::UnknownAttribute {
                from: from.to_string(),
                resource: resource.to_string(),
                resource_type: target.resource_type().to_string(),
                attribute: attribute.to_string(),
            });
        }
        Ok(())
    }
}
