//! `AWS::S3::Bucket` and its event notification configuration

use serde::Serialize;

use crate::error::PropertyError;
use crate::expr::Expr;
use crate::resource::ResourceProperties;

/// Event names accepted in bucket notification configurations
pub const EVENT_TYPES: &[&str] = &[
    "s3:ObjectCreated:*",
    "s3:ObjectCreated:Put",
    "s3:ObjectCreated:Post",
    "s3:ObjectCreated:Copy",
    "s3:ObjectCreated:CompleteMultipartUpload",
    "s3:ObjectRemoved:*",
    "s3:ObjectRemoved:Delete",
    "s3:ObjectRemoved:DeleteMarkerCreated",
    "s3:ObjectRestore:*",
    "s3:ObjectRestore:Post",
    "s3:ObjectRestore:Completed",
    "s3:ReducedRedundancyLostObject",
    "s3:Replication:*",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bucket {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_configuration: Option<NotificationConfiguration>,
}

impl ResourceProperties for Bucket {
    const RESOURCE_TYPE: &'static str = "AWS::S3::Bucket";
    const ATTRIBUTES: &'static [&'static str] = &[
        "Arn",
        "DomainName",
        "DualStackDomainName",
        "RegionalDomainName",
        "WebsiteURL",
    ];

    fn validate(&self) -> Result<(), PropertyError> {
        if self.bucket_name.as_ref().is_some_and(Expr::is_blank) {
            return Err(PropertyError::missing("BucketName"));
        }
        if let Some(notifications) = &self.notification_configuration {
            for lambda in &notifications.lambda_configurations {
                lambda.validate()?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationConfiguration {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lambda_configurations: Vec<LambdaConfiguration>,
}

/// Invoke a function when matching objects change
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LambdaConfiguration {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<NotificationFilter>,
    pub function: Expr,
}

impl LambdaConfiguration {
    fn validate(&self) -> Result<(), PropertyError> {
        if !EVENT_TYPES.contains(&self.event.as_str()) {
            return Err(PropertyError::new(
                "LambdaConfigurations.Event",
                format!("'{}' is not a valid S3 event type", self.event),
            ));
        }
        if self.function.is_blank() {
            return Err(PropertyError::missing("LambdaConfigurations.Function"));
        }
        if let Some(filter) = &self.filter {
            filter.s3_key.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationFilter {
    pub s3_key: S3KeyFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3KeyFilter {
    pub rules: Vec<FilterRule>,
}

impl S3KeyFilter {
    pub fn prefix_and_suffix(prefix: impl Into<Expr>, suffix: impl Into<Expr>) -> Self {
        Self {
            rules: vec![FilterRule::prefix(prefix), FilterRule::suffix(suffix)],
        }
    }

    fn validate(&self) -> Result<(), PropertyError> {
        const FIELD: &str = "Filter.S3Key.Rules";

        if self.rules.is_empty() {
            return Err(PropertyError::new(FIELD, "at least one rule is required"));
        }
        for name in [FilterRuleName::Prefix, FilterRuleName::Suffix] {
            if self.rules.iter().filter(|rule| rule.name == name).count() > 1 {
                return Err(PropertyError::new(
                    FIELD,
                    format!("more than one '{}' rule", name.as_str()),
                ));
            }
        }
        if self.rules.iter().any(|rule| rule.value.is_blank()) {
            return Err(PropertyError::new(FIELD, "rule value must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterRuleName {
    Prefix,
    Suffix,
}

impl FilterRuleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterRuleName::Prefix => "prefix",
            FilterRuleName::Suffix => "suffix",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilterRule {
    pub name: FilterRuleName,
    pub value: Expr,
}

impl FilterRule {
    pub fn prefix(value: impl Into<Expr>) -> Self {
        Self {
            name: FilterRuleName::Prefix,
            value: value.into(),
        }
    }

    pub fn suffix(value: impl Into<Expr>) -> Self {
        Self {
            name: FilterRuleName::Suffix,
            value: value.into(),
        }
    }
}
