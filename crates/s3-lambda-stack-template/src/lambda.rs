//! `AWS::Lambda::Function` and `AWS::Lambda::Permission`

use serde::Serialize;

use crate::error::PropertyError;
use crate::expr::Expr;
use crate::resource::ResourceProperties;

pub const MIN_MEMORY_MB: i64 = 128;
pub const MAX_MEMORY_MB: i64 = 1536;
pub const MEMORY_STEP_MB: i64 = 64;
pub const MAX_TIMEOUT_SECS: i64 = 900;

/// Memory sizes a function may be configured with: 128..=1536 in steps of 64
pub fn memory_values() -> Vec<i64> {
    (MIN_MEMORY_MB..=MAX_MEMORY_MB)
        .step_by(MEMORY_STEP_MB as usize)
        .collect()
}

pub fn is_valid_memory_size(mb: i64) -> bool {
    (MIN_MEMORY_MB..=MAX_MEMORY_MB).contains(&mb) && (mb - MIN_MEMORY_MB) % MEMORY_STEP_MB == 0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Function {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<Expr>,
    pub code: Code,
    pub handler: Expr,
    pub role: Expr,
    pub runtime: Expr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_size: Option<Expr>,
}

impl ResourceProperties for Function {
    const RESOURCE_TYPE: &'static str = "AWS::Lambda::Function";
    const ATTRIBUTES: &'static [&'static str] = &["Arn"];

    fn validate(&self) -> Result<(), PropertyError> {
        if self.function_name.as_ref().is_some_and(Expr::is_blank) {
            return Err(PropertyError::missing("FunctionName"));
        }
        if self.handler.is_blank() {
            return Err(PropertyError::missing("Handler"));
        }
        if self.role.is_blank() {
            return Err(PropertyError::missing("Role"));
        }
        if self.runtime.is_blank() {
            return Err(PropertyError::missing("Runtime"));
        }
        self.code.validate()?;

        // Intrinsics resolve at deploy time; only literals can be checked here
        if let Some(memory) = self.memory_size.as_ref() {
            if let Expr::Str(_) | Expr::Int(_) = memory {
                match memory.as_int() {
                    Some(mb) if is_valid_memory_size(mb) => {}
                    _ => {
                        return Err(PropertyError::new(
                            "MemorySize",
                            format!(
                                "must be {}..={} in steps of {}",
                                MIN_MEMORY_MB, MAX_MEMORY_MB, MEMORY_STEP_MB
                            ),
                        ))
                    }
                }
            }
        }
        if let Some(timeout) = self.timeout.as_ref() {
            if let Expr::Str(_) | Expr::Int(_) = timeout {
                match timeout.as_int() {
                    Some(secs) if (1..=MAX_TIMEOUT_SECS).contains(&secs) => {}
                    _ => {
                        return Err(PropertyError::new(
                            "Timeout",
                            format!("must be between 1 and {} seconds", MAX_TIMEOUT_SECS),
                        ))
                    }
                }
            }
        }
        Ok(())
    }
}

/// Deployment package location: inline source or an object in S3
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Code {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_bucket: Option<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_file: Option<Expr>,
}

impl Code {
    pub fn s3(bucket: impl Into<Expr>, key: impl Into<Expr>) -> Self {
        Self {
            s3_bucket: Some(bucket.into()),
            s3_key: Some(key.into()),
            zip_file: None,
        }
    }

    fn validate(&self) -> Result<(), PropertyError> {
        let present = |field: &Option<Expr>| field.as_ref().is_some_and(|e| !e.is_blank());

        match (present(&self.zip_file), present(&self.s3_bucket), present(&self.s3_key)) {
            (true, false, false) | (false, true, true) => Ok(()),
            (true, _, _) => Err(PropertyError::new(
                "Code",
                "ZipFile cannot be combined with S3Bucket or S3Key",
            )),
            (false, false, false) => Err(PropertyError::new(
                "Code",
                "either ZipFile or both S3Bucket and S3Key are required",
            )),
            (false, true, false) => Err(PropertyError::missing("Code.S3Key")),
            (false, false, true) => Err(PropertyError::missing("Code.S3Bucket")),
        }
    }
}

/// Grants a service principal permission to invoke a function
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Permission {
    pub action: Expr,
    pub function_name: Expr,
    pub principal: Expr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_account: Option<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_arn: Option<Expr>,
}

impl ResourceProperties for Permission {
    const RESOURCE_TYPE: &'static str = "AWS::Lambda::Permission";

    fn validate(&self) -> Result<(), PropertyError> {
        if self.action.is_blank() {
            return Err(PropertyError::missing("Action"));
        }
        if self.function_name.is_blank() {
            return Err(PropertyError::missing("FunctionName"));
        }
        if self.principal.is_blank() {
            return Err(PropertyError::missing("Principal"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn function() -> Function {
        Function {
            function_name: Some(Expr::reference("FunctionName")),
            code: Code::s3(Expr::reference("CodeBucketName"), Expr::reference("CodeS3Key")),
            handler: "gztosnappy.lambda_handler".into(),
            role: Expr::get_att("LambdaExecutionRole", "Arn"),
            runtime: "python2.7".into(),
            timeout: Some(Expr::reference("LambdaTimeout")),
            memory_size: Some(Expr::reference("LambdaMemorySize")),
        }
    }

    #[test]
    fn test_memory_values() {
        let values = memory_values();
        assert_eq!(values.first(), Some(&128));
        assert_eq!(values.last(), Some(&1536));
        assert_eq!(values.len(), 23);
        assert!(values.contains(&512));
        assert!(is_valid_memory_size(192));
        assert!(!is_valid_memory_size(200));
        assert!(!is_valid_memory_size(1600));
    }

    #[test]
    fn test_function_serialization() {
        let f = function();
        assert!(f.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&f).unwrap(),
            json!({
                "FunctionName": {"Ref": "FunctionName"},
                "Code": {"S3Bucket": {"Ref": "CodeBucketName"}, "S3Key": {"Ref": "CodeS3Key"}},
                "Handler": "gztosnappy.lambda_handler",
                "Role": {"Fn::GetAtt": ["LambdaExecutionRole", "Arn"]},
                "Runtime": "python2.7",
                "Timeout": {"Ref": "LambdaTimeout"},
                "MemorySize": {"Ref": "LambdaMemorySize"}
            })
        );
    }

    #[test]
    fn test_required_fields() {
        let mut f = function();
        f.handler = "".into();
        assert_eq!(f.validate().unwrap_err().field, "Handler");

        let mut f = function();
        f.runtime = " ".into();
        assert_eq!(f.validate().unwrap_err().field, "Runtime");
    }

    #[test]
    fn test_literal_memory_and_timeout_checked() {
        let mut f = function();
        f.memory_size = Some(Expr::Int(500));
        assert_eq!(f.validate().unwrap_err().field, "MemorySize");

        let mut f = function();
        f.memory_size = Some("1024".into());
        f.timeout = Some(Expr::Int(0));
        assert_eq!(f.validate().unwrap_err().field, "Timeout");

        let mut f = function();
        f.timeout = Some(Expr::Int(900));
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_code_combinations() {
        let mut f = function();
        f.code = Code::default();
        assert!(f.validate().is_err());

        f.code = Code {
            zip_file: Some("def handler(e, c): pass".into()),
            ..Code::default()
        };
        assert!(f.validate().is_ok());

        f.code.s3_key = Some("pub/code.zip".into());
        assert!(f.validate().is_err());

        f.code = Code {
            s3_bucket: Some("code-bucket".into()),
            ..Code::default()
        };
        assert_eq!(f.validate().unwrap_err().field, "Code.S3Key");
    }

    #[test]
    fn test_permission_requires_principal() {
        let permission = Permission {
            action: "lambda:InvokeFunction".into(),
            function_name: Expr::get_att("Fn", "Arn"),
            principal: "".into(),
            source_account: None,
            source_arn: None,
        };
        assert_eq!(permission.validate().unwrap_err().field, "Principal");
    }
}
