//! Parameter declarations

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, TemplateError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterType {
    String,
    Number,
    #[serde(rename = "List<Number>")]
    NumberList,
    CommaDelimitedList,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "String",
            ParameterType::Number => "Number",
            ParameterType::NumberList => "List<Number>",
            ParameterType::CommaDelimitedList => "CommaDelimitedList",
        }
    }
}

impl std::fmt::Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value supplied at provisioning time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(skip)]
    pub(crate) logical_id: String,
    #[serde(rename = "Type")]
    pub kind: ParameterType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<Value>,
}

impl Parameter {
    pub fn new(logical_id: impl Into<String>, kind: ParameterType) -> Self {
        Self {
            logical_id: logical_id.into(),
            kind,
            description: None,
            default: None,
            allowed_values: Vec::new(),
        }
    }

    pub fn string(logical_id: impl Into<String>) -> Self {
        Self::new(logical_id, ParameterType::String)
    }

    pub fn number(logical_id: impl Into<String>) -> Self {
        Self::new(logical_id, ParameterType::Number)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, default: impl ToString) -> Self {
        self.default = Some(default.to_string());
        self
    }

    pub fn allowed_values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    /// Checks the default against the declared type and allowed values
    pub(crate) fn validate(&self) -> Result<()> {
        let Some(default) = self.default.as_deref() else {
            return Ok(());
        };

        if self.kind == ParameterType::Number && default.trim().parse::<f64>().is_err() {
            return Err(self.invalid(format!("default '{}' is not a number", default)));
        }

        if !self.allowed_values.is_empty()
            && !self
                .allowed_values
                .iter()
                .any(|allowed| allowed_matches(allowed, default))
        {
            return Err(self.invalid(format!(
                "default '{}' is not one of the allowed values",
                default
            )));
        }

        Ok(())
    }

    fn invalid(&self, reason: String) -> TemplateError {
        TemplateError::InvalidParameter {
            parameter: self.logical_id.clone(),
            reason,
        }
    }
}

fn allowed_matches(allowed: &Value, candidate: &str) -> bool {
    match allowed {
        Value::String(s) => s == candidate,
        Value::Number(n) => n.to_string() == candidate.trim(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_parameter_serializes_default_as_string() {
        let param = Parameter::number("LambdaTimeout")
            .description("Timeout in seconds for the Lambda function")
            .default_value(180);
        assert!(param.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&param).unwrap(),
            json!({
                "Type": "Number",
                "Description": "Timeout in seconds for the Lambda function",
                "Default": "180"
            })
        );
    }

    #[test]
    fn test_default_must_be_allowed() {
        let param = Parameter::number("LambdaMemorySize")
            .default_value(500)
            .allowed_values([128, 256, 512]);
        let err = param.validate().unwrap_err();
        assert!(err.to_string().contains("LambdaMemorySize"));

        let ok = Parameter::number("LambdaMemorySize")
            .default_value(512)
            .allowed_values([128, 256, 512]);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_number_default_must_parse() {
        let param = Parameter::number("LambdaTimeout").default_value("three minutes");
        assert!(matches!(
            param.validate(),
            Err(TemplateError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_list_type_name() {
        assert_eq!(ParameterType::NumberList.to_string(), "List<Number>");
        assert_eq!(
            serde_json::to_value(ParameterType::NumberList).unwrap(),
            json!("List<Number>")
        );
    }
}
