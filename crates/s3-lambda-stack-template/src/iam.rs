//! `AWS::IAM::Role` with inline policies

use serde::Serialize;

use crate::error::PropertyError;
use crate::expr::Expr;
use crate::resource::ResourceProperties;

pub const POLICY_VERSION: &str = "2012-10-17";
const LEGACY_POLICY_VERSION: &str = "2008-10-17";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    pub assume_role_policy_document: PolicyDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<Policy>,
}

impl ResourceProperties for Role {
    const RESOURCE_TYPE: &'static str = "AWS::IAM::Role";
    const ATTRIBUTES: &'static [&'static str] = &["Arn", "RoleId"];

    fn validate(&self) -> Result<(), PropertyError> {
        if let Some(path) = &self.path {
            if !path.starts_with('/') || !path.ends_with('/') {
                return Err(PropertyError::new(
                    "Path",
                    format!("'{}' must begin and end with '/'", path),
                ));
            }
        }
        self.assume_role_policy_document
            .validate("AssumeRolePolicyDocument")?;
        for policy in &self.policies {
            if policy.policy_name.trim().is_empty() {
                return Err(PropertyError::missing("Policies.PolicyName"));
            }
            policy.policy_document.validate("Policies.PolicyDocument")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Policy {
    pub policy_name: String,
    pub policy_document: PolicyDocument,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    pub fn new(statement: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement,
        }
    }

    fn validate(&self, field: &'static str) -> Result<(), PropertyError> {
        if self.version != POLICY_VERSION && self.version != LEGACY_POLICY_VERSION {
            return Err(PropertyError::new(
                field,
                format!("unsupported policy version '{}'", self.version),
            ));
        }
        if self.statement.is_empty() {
            return Err(PropertyError::new(field, "at least one statement is required"));
        }
        for statement in &self.statement {
            if statement.action.is_empty() || statement.action.iter().any(|a| a.trim().is_empty()) {
                return Err(PropertyError::new(
                    field,
                    "every statement needs at least one non-empty action",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: Effect,
    pub action: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resources>,
}

impl Statement {
    pub fn allow<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            effect: Effect::Allow,
            action: actions.into_iter().map(Into::into).collect(),
            principal: None,
            resource: None,
        }
    }

    pub fn on(mut self, resource: Resources) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn for_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Principal {
    pub service: Vec<String>,
}

impl Principal {
    pub fn service(name: impl Into<String>) -> Self {
        Self {
            service: vec![name.into()],
        }
    }
}

/// Statement resources: a single pattern or a list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resources {
    One(Expr),
    Many(Vec<Expr>),
}
