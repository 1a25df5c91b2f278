//! The GzipToSnappy stack: an input bucket that invokes a function for every
//! `.gz` object created under the input prefix, plus the role that lets the
//! function read its input and write its output.

use s3_lambda_stack_config::GeneratorConfig;
use s3_lambda_stack_template::iam::{Policy, PolicyDocument, Principal, Resources, Role, Statement};
use s3_lambda_stack_template::lambda::{self, Code, Function, Permission};
use s3_lambda_stack_template::s3::{
    Bucket, LambdaConfiguration, NotificationConfiguration, NotificationFilter, S3KeyFilter,
};
use s3_lambda_stack_template::{Expr, Output, Parameter, Resource, Result, Template};
use tracing::debug;

pub const INPUT_BUCKET_NAME: &str = "InputBucketName";
pub const INPUT_KEY_PREFIX: &str = "InputKeyPrefix";
pub const OUTPUT_BUCKET_NAME: &str = "OutputBucketName";
pub const OUTPUT_KEY_PREFIX: &str = "OutputKeyPrefix";
pub const CODE_BUCKET_NAME: &str = "CodeBucketName";
pub const CODE_S3_KEY: &str = "CodeS3Key";
pub const FUNCTION_NAME: &str = "FunctionName";
pub const LAMBDA_MEMORY_SIZE: &str = "LambdaMemorySize";
pub const LAMBDA_TIMEOUT: &str = "LambdaTimeout";

pub const BUCKET: &str = "S3Bucket";
pub const BUCKET_PERMISSION: &str = "BucketPermission";
pub const FUNCTION: &str = "GzipToSnappyFunction";
pub const EXECUTION_ROLE: &str = "LambdaExecutionRole";

const S3_ARN_PREFIX: &str = "arn:aws:s3:::";
const LOGS_ARN: &str = "arn:aws:logs:*:*:*";

/// `Ref`s to every declared parameter
struct Parameters {
    input_bucket: Expr,
    input_prefix: Expr,
    output_bucket: Expr,
    output_prefix: Expr,
    code_bucket: Expr,
    code_key: Expr,
    function_name: Expr,
    memory_size: Expr,
    timeout: Expr,
}

/// Declare the whole stack
pub fn build_template(config: &GeneratorConfig) -> Result<Template> {
    let mut t = Template::new();
    t.set_description(config.template.description.as_str())?;

    let params = declare_parameters(&mut t, config)?;

    let function_arn = Expr::get_att(FUNCTION, "Arn");

    t.add_resource(input_bucket(config, &params, &function_arn)?)?;
    t.add_resource(bucket_permission(&params, &function_arn)?)?;
    t.add_resource(function(config, &params)?)?;
    t.add_resource(execution_role(config, &params)?)?;

    t.add_output(
        "FunctionArn",
        Output::new(function_arn).description("ARN of the conversion function"),
    )?;
    t.add_output(
        "ExecutionRoleArn",
        Output::new(Expr::get_att(EXECUTION_ROLE, "Arn"))
            .description("ARN of the function's execution role"),
    )?;
    t.add_output(
        "InputBucket",
        Output::new(Expr::reference(BUCKET)).description("Name of the input bucket"),
    )?;

    debug!(
        parameters = t.parameter_ids().count(),
        resources = t.resource_ids().count(),
        "Declared stack"
    );
    Ok(t)
}

fn declare_parameters(t: &mut Template, config: &GeneratorConfig) -> Result<Parameters> {
    let defaults = &config.parameters;

    let input_bucket = t.add_parameter(
        Parameter::string(INPUT_BUCKET_NAME).description("The name of the input bucket"),
    )?;
    let input_prefix = t.add_parameter(
        Parameter::string(INPUT_KEY_PREFIX)
            .description("The S3 input folder for incoming files")
            .default_value(&defaults.input_key_prefix),
    )?;
    let output_bucket = t.add_parameter(
        Parameter::string(OUTPUT_BUCKET_NAME)
            .description("The name of the output bucket. This is required"),
    )?;
    let output_prefix = t.add_parameter(
        Parameter::string(OUTPUT_KEY_PREFIX)
            .description("The S3 output folder for processed files")
            .default_value(&defaults.output_key_prefix),
    )?;
    let code_bucket = t.add_parameter(Parameter::string(CODE_BUCKET_NAME).description(
        "Amazon S3 bucket name where the .zip file containing your deployment package is stored.",
    ))?;
    let code_key = t.add_parameter(
        Parameter::string(CODE_S3_KEY)
            .description("The Amazon S3 object (the deployment package) key name you want to upload")
            .default_value(&defaults.code_s3_key),
    )?;
    let function_name = t.add_parameter(
        Parameter::string(FUNCTION_NAME)
            .description("The name of the lambda function")
            .default_value(&defaults.function_name),
    )?;
    let memory_size = t.add_parameter(
        Parameter::number(LAMBDA_MEMORY_SIZE)
            .description("Amount of memory to allocate to the lambda function")
            .default_value(defaults.memory_size)
            .allowed_values(lambda::memory_values()),
    )?;
    let timeout = t.add_parameter(
        Parameter::number(LAMBDA_TIMEOUT)
            .description("Timeout in seconds for the Lambda function")
            .default_value(defaults.timeout),
    )?;

    Ok(Parameters {
        input_bucket,
        input_prefix,
        output_bucket,
        output_prefix,
        code_bucket,
        code_key,
        function_name,
        memory_size,
        timeout,
    })
}

/// The bucket cannot validate its notification target until the permission
/// exists, hence the explicit dependency.
fn input_bucket(config: &GeneratorConfig, params: &Parameters, function_arn: &Expr) -> Result<Resource> {
    let notification = LambdaConfiguration {
        event: config.function.event.clone(),
        filter: Some(NotificationFilter {
            s3_key: S3KeyFilter::prefix_and_suffix(
                &params.input_prefix,
                config.function.key_suffix.as_str(),
            ),
        }),
        function: function_arn.clone(),
    };

    let bucket = Bucket {
        bucket_name: Some(params.input_bucket.clone()),
        notification_configuration: Some(NotificationConfiguration {
            lambda_configurations: vec![notification],
        }),
    };

    Ok(Resource::new(BUCKET, bucket)?.depends_on(BUCKET_PERMISSION))
}

/// Lets S3 invoke the function for events from the input bucket of this account.
/// The source ARN is built from the bucket name parameter rather than the
/// bucket resource, which itself depends on this permission.
fn bucket_permission(params: &Parameters, function_arn: &Expr) -> Result<Resource> {
    let permission = Permission {
        action: "lambda:InvokeFunction".into(),
        function_name: function_arn.clone(),
        principal: "s3.amazonaws.com".into(),
        source_account: Some(Expr::account_id()),
        source_arn: Some(Expr::join(
            "",
            [Expr::literal(S3_ARN_PREFIX), params.input_bucket.clone()],
        )),
    };
    Resource::new(BUCKET_PERMISSION, permission)
}

fn function(config: &GeneratorConfig, params: &Parameters) -> Result<Resource> {
    let function = Function {
        function_name: Some(params.function_name.clone()),
        code: Code::s3(&params.code_bucket, &params.code_key),
        handler: config.function.handler.as_str().into(),
        role: Expr::get_att(EXECUTION_ROLE, "Arn"),
        runtime: config.function.runtime.as_str().into(),
        timeout: Some(params.timeout.clone()),
        memory_size: Some(params.memory_size.clone()),
    };
    Resource::new(FUNCTION, function)
}

fn execution_role(config: &GeneratorConfig, params: &Parameters) -> Result<Resource> {
    let objects = Statement::allow(["s3:GetObject", "s3:PutObject", "s3:DeleteObject"]).on(
        Resources::Many(vec![
            objects_under_prefix(&params.input_bucket, &params.input_prefix),
            objects_under_prefix(&params.output_bucket, &params.output_prefix),
        ]),
    );
    let logs = Statement::allow(["logs:*"]).on(Resources::One(LOGS_ARN.into()));

    let role = Role {
        assume_role_policy_document: PolicyDocument::new(vec![Statement::allow([
            "sts:AssumeRole",
        ])
        .for_principal(Principal::service("lambda.amazonaws.com"))]),
        path: Some("/".to_string()),
        policies: vec![Policy {
            policy_name: config.function.policy_name.clone(),
            policy_document: PolicyDocument::new(vec![objects, logs]),
        }],
    };
    Resource::new(EXECUTION_ROLE, role)
}

/// `arn:aws:s3:::<bucket>/<prefix>*`
fn objects_under_prefix(bucket: &Expr, prefix: &Expr) -> Expr {
    let path = Expr::join("/", [bucket, prefix]);
    Expr::join(
        ":",
        [
            Expr::literal("arn"),
            Expr::literal("aws"),
            Expr::literal("s3"),
            Expr::literal(""),
            Expr::literal(""),
            Expr::join("", [path, Expr::literal("*")]),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rendered() -> serde_json::Value {
        build_template(&GeneratorConfig::default())
            .unwrap()
            .to_value()
            .unwrap()
    }

    #[test]
    fn test_declares_expected_ids() {
        let t = build_template(&GeneratorConfig::default()).unwrap();
        assert_eq!(
            t.resource_ids().collect::<Vec<_>>(),
            vec![BUCKET_PERMISSION, FUNCTION, EXECUTION_ROLE, BUCKET]
        );
        assert_eq!(
            t.resource(FUNCTION).map(|r| r.resource_type()),
            Some("AWS::Lambda::Function")
        );
        assert_eq!(t.parameter_ids().count(), 9);
        assert_eq!(
            t.output_ids().collect::<Vec<_>>(),
            vec!["ExecutionRoleArn", "FunctionArn", "InputBucket"]
        );
    }

    #[test]
    fn test_objects_under_prefix_shape() {
        let arn = objects_under_prefix(
            &Expr::reference(INPUT_BUCKET_NAME),
            &Expr::reference(INPUT_KEY_PREFIX),
        );
        assert_eq!(
            serde_json::to_value(arn).unwrap(),
            json!({"Fn::Join": [":", ["arn", "aws", "s3", "", "",
                {"Fn::Join": ["", [
                    {"Fn::Join": ["/", [{"Ref": "InputBucketName"}, {"Ref": "InputKeyPrefix"}]]},
                    "*"
                ]]}
            ]]})
        );
    }

    #[test]
    fn test_permission_source() {
        let doc = rendered();
        let props = &doc["Resources"][BUCKET_PERMISSION]["Properties"];
        assert_eq!(props["Action"], "lambda:InvokeFunction");
        assert_eq!(props["Principal"], "s3.amazonaws.com");
        assert_eq!(props["SourceAccount"], json!({"Ref": "AWS::AccountId"}));
        assert_eq!(
            props["SourceArn"],
            json!({"Fn::Join": ["", ["arn:aws:s3:::", {"Ref": "InputBucketName"}]]})
        );
        assert_eq!(
            doc["Resources"][BUCKET]["DependsOn"],
            json!([BUCKET_PERMISSION])
        );
    }

    #[test]
    fn test_config_changes_literals_and_defaults() {
        let mut config = GeneratorConfig::default();
        config.function.runtime = "python3.12".to_string();
        config.function.key_suffix = ".gzip".to_string();
        config.parameters.memory_size = 1024;

        let doc = build_template(&config).unwrap().to_value().unwrap();
        assert_eq!(
            doc["Resources"][FUNCTION]["Properties"]["Runtime"],
            "python3.12"
        );
        assert_eq!(doc["Parameters"][LAMBDA_MEMORY_SIZE]["Default"], "1024");
        let rules = &doc["Resources"][BUCKET]["Properties"]["NotificationConfiguration"]
            ["LambdaConfigurations"][0]["Filter"]["S3Key"]["Rules"];
        assert_eq!(rules[1], json!({"Name": "suffix", "Value": ".gzip"}));
    }

    #[test]
    fn test_invalid_event_surfaces_as_property_error() {
        let mut config = GeneratorConfig::default();
        config.function.event = "s3:ObjectUploaded".to_string();
        let err = build_template(&config).unwrap_err();
        assert!(err.to_string().contains(BUCKET));
    }
}
