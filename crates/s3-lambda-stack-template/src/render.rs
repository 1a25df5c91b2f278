//! Template serialization
//!
//! Keys are emitted in lexicographic order (serde_json's map is a BTreeMap),
//! so the same declarations always render to the same bytes.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;
use crate::{Template, FORMAT_VERSION};

const JSON_INDENT: &[u8] = b"    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Yaml => write!(f, "yaml"),
        }
    }
}

impl Template {
    /// Validate and build the document tree
    pub fn to_value(&self) -> Result<Value> {
        self.validate()?;

        let mut root = Map::new();
        root.insert(
            "AWSTemplateFormatVersion".to_string(),
            Value::from(FORMAT_VERSION),
        );
        if let Some(description) = &self.description {
            root.insert("Description".to_string(), Value::from(description.as_str()));
        }

        if !self.parameters.is_empty() {
            let mut parameters = Map::new();
            for (id, parameter) in &self.parameters {
                parameters.insert(id.clone(), serde_json::to_value(parameter)?);
            }
            root.insert("Parameters".to_string(), Value::Object(parameters));
        }

        let resources = self
            .resources
            .iter()
            .map(|(id, resource)| (id.clone(), resource.to_value()))
            .collect::<Map<_, _>>();
        root.insert("Resources".to_string(), Value::Object(resources));

        if !self.outputs.is_empty() {
            let mut outputs = Map::new();
            for (id, output) in &self.outputs {
                outputs.insert(id.clone(), serde_json::to_value(output)?);
            }
            root.insert("Outputs".to_string(), Value::Object(outputs));
        }

        Ok(Value::Object(root))
    }

    /// JSON indented by four spaces, no trailing newline
    pub fn to_json(&self) -> Result<String> {
        let value = self.to_value()?;
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
        value.serialize(&mut serializer)?;
        Ok(String::from_utf8(buf)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        let value = self.to_value()?;
        let yaml = serde_yaml::to_string(&value)?;
        Ok(yaml.trim_end().to_string())
    }

    pub fn render(&self, format: Format) -> Result<String> {
        let rendered = match format {
            Format::Json => self.to_json()?,
            Format::Yaml => self.to_yaml()?,
        };
        debug!(%format, bytes = rendered.len(), "Rendered template");
        Ok(rendered)
    }
}
