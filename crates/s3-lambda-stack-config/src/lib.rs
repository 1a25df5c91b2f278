// s3-lambda-stack-config - Generator configuration
//
// Supports configuration from multiple sources:
// 1. CLI flags (applied by the binary, highest priority)
// 2. Environment variables (S3_LAMBDA_STACK_* prefix, logging only)
// 3. TOML config file passed with --config
// 4. Built-in defaults (lowest priority)
//
// Only the config file and CLI flags can change the generated document.

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{EnvSource, ENV_PREFIX};

const DEFAULT_DESCRIPTION: &str = "AWS CloudFormation template for GzipToSnappy: \
This template creates an S3 bucket and a Lambda function \
to trigger when gzip files are loaded on the S3 bucket. \
**WARNING**: You will be billed for AWS resources created.";

/// Main generator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub template: TemplateConfig,

    #[serde(default)]
    pub parameters: ParameterDefaults,

    #[serde(default)]
    pub function: FunctionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Document-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    pub description: String,
    pub format: OutputFormat,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            format: OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => anyhow::bail!("Unsupported output format: {}. Supported: json, yaml", s),
        }
    }
}

/// Defaults baked into the template's parameter declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterDefaults {
    pub input_key_prefix: String,
    pub output_key_prefix: String,
    pub code_s3_key: String,
    pub function_name: String,
    pub memory_size: u32,
    pub timeout: u32,
}

impl Default for ParameterDefaults {
    fn default() -> Self {
        Self {
            input_key_prefix: "stg/input-gz/".to_string(),
            output_key_prefix: "stg/processed-snappy/".to_string(),
            code_s3_key: "pub/gziptosnappy.zip".to_string(),
            function_name: "gziptosnappy".to_string(),
            memory_size: 512,
            timeout: 180,
        }
    }
}

/// Literal settings of the function and its trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FunctionConfig {
    pub handler: String,
    pub runtime: String,
    pub key_suffix: String,
    pub event: String,
    pub policy_name: String,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            handler: "gztosnappy.lambda_handler".to_string(),
            runtime: "python2.7".to_string(),
            key_suffix: ".gz".to_string(),
            event: "s3:ObjectCreated:*".to_string(),
            policy_name: "LambdaGzToSnappy".to_string(),
        }
    }
}

/// Diagnostics logging (always written to stderr)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl GeneratorConfig {
    /// Load configuration: defaults, optional config file, environment overrides
    pub fn load(path: Option<&std::path::Path>) -> Result<Self> {
        sources::load_config(path, &sources::StdEnvSource)
    }

    /// Load with a custom environment source (useful for testing)
    pub fn load_with_env<E: EnvSource>(path: Option<&std::path::Path>, env: &E) -> Result<Self> {
        sources::load_config(path, env)
    }

    /// Parse TOML content layered over the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        sources::parse_toml(content)
    }

    /// Apply environment overrides from a custom source
    pub fn apply_env_overrides_from<E: EnvSource>(&mut self, env: &E) -> Result<()> {
        env_overrides::apply_env_overrides(self, env)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}
