//! Intrinsic expressions (`Ref`, `Fn::GetAtt`, `Fn::Join`) and literals
//!
//! Anything that can sit in a property value position of a resource is an
//! [`Expr`]. Serialization follows the CloudFormation JSON long form.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Pseudo parameters provided by CloudFormation itself
pub mod pseudo {
    pub const ACCOUNT_ID: &str = "AWS::AccountId";
    pub const NOTIFICATION_ARNS: &str = "AWS::NotificationARNs";
    pub const NO_VALUE: &str = "AWS::NoValue";
    pub const PARTITION: &str = "AWS::Partition";
    pub const REGION: &str = "AWS::Region";
    pub const STACK_ID: &str = "AWS::StackId";
    pub const STACK_NAME: &str = "AWS::StackName";
    pub const URL_SUFFIX: &str = "AWS::URLSuffix";

    pub const ALL: &[&str] = &[
        ACCOUNT_ID,
        NOTIFICATION_ARNS,
        NO_VALUE,
        PARTITION,
        REGION,
        STACK_ID,
        STACK_NAME,
        URL_SUFFIX,
    ];

    pub fn is_pseudo(name: &str) -> bool {
        ALL.contains(&name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Str(String),
    Int(i64),
    Ref(String),
    GetAtt { resource: String, attribute: String },
    Join { delimiter: String, values: Vec<Expr> },
}

impl Expr {
    pub fn literal(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Expr::Ref(name.into())
    }

    pub fn get_att(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Expr::GetAtt {
            resource: resource.into(),
            attribute: attribute.into(),
        }
    }

    pub fn join<I>(delimiter: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        Expr::Join {
            delimiter: delimiter.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `Ref AWS::AccountId`
    pub fn account_id() -> Self {
        Expr::Ref(pseudo::ACCOUNT_ID.to_string())
    }

    /// Literal integer content; numeric strings count as integers too
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Expr::Int(n) => Some(*n),
            Expr::Str(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// True for literal strings that are empty or whitespace.
    /// Intrinsics are resolved at deploy time and never count as blank.
    pub fn is_blank(&self) -> bool {
        matches!(self, Expr::Str(s) if s.trim().is_empty())
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::Str(value.to_string())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Expr::Str(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Int(value)
    }
}

impl From<&Expr> for Expr {
    fn from(value: &Expr) -> Self {
        value.clone()
    }
}

struct JoinArgs<'a> {
    delimiter: &'a str,
    values: &'a [Expr],
}

impl Serialize for JoinArgs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(self.delimiter)?;
        seq.serialize_element(self.values)?;
        seq.end()
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Expr::Str(s) => serializer.serialize_str(s),
            Expr::Int(n) => serializer.serialize_i64(*n),
            Expr::Ref(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", name)?;
                map.end()
            }
            Expr::GetAtt {
                resource,
                attribute,
            } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[resource, attribute])?;
                map.end()
            }
            Expr::Join { delimiter, values } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &JoinArgs { delimiter, values })?;
                map.end()
            }
        }
    }
}
