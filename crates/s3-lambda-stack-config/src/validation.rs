// Configuration validation
//
// Rejects values that would produce a template CloudFormation refuses, and
// warns about ones that are legal but probably unintended.

use crate::*;
use anyhow::{bail, Result};
use s3_lambda_stack_template::lambda::{
    is_valid_memory_size, MAX_MEMORY_MB, MAX_TIMEOUT_SECS, MEMORY_STEP_MB, MIN_MEMORY_MB,
};
use s3_lambda_stack_template::s3::EVENT_TYPES;
use s3_lambda_stack_template::MAX_DESCRIPTION_BYTES;
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub fn validate_config(config: &GeneratorConfig) -> Result<()> {
    validate_template_config(&config.template)?;
    validate_parameter_defaults(&config.parameters)?;
    validate_function_config(&config.function)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_template_config(config: &TemplateConfig) -> Result<()> {
    if config.description.len() > MAX_DESCRIPTION_BYTES {
        bail!(
            "template.description is {} bytes; at most {} allowed",
            config.description.len(),
            MAX_DESCRIPTION_BYTES
        );
    }
    Ok(())
}

fn validate_parameter_defaults(config: &ParameterDefaults) -> Result<()> {
    validate_prefix("parameters.input_key_prefix", &config.input_key_prefix)?;
    validate_prefix("parameters.output_key_prefix", &config.output_key_prefix)?;

    if config.code_s3_key.trim().is_empty() {
        bail!("parameters.code_s3_key must not be empty");
    }

    if config.function_name.trim().is_empty() {
        bail!("parameters.function_name must not be empty");
    }
    if config.function_name.len() > 64 {
        bail!("parameters.function_name must be at most 64 characters");
    }

    if !is_valid_memory_size(i64::from(config.memory_size)) {
        bail!(
            "parameters.memory_size must be {}..={} in steps of {}, got {}",
            MIN_MEMORY_MB,
            MAX_MEMORY_MB,
            MEMORY_STEP_MB,
            config.memory_size
        );
    }

    if config.timeout == 0 || i64::from(config.timeout) > MAX_TIMEOUT_SECS {
        bail!(
            "parameters.timeout must be between 1 and {} seconds, got {}",
            MAX_TIMEOUT_SECS,
            config.timeout
        );
    }

    if !config.code_s3_key.ends_with(".zip") {
        warn!(
            code_s3_key = %config.code_s3_key,
            "parameters.code_s3_key does not name a .zip deployment package"
        );
    }

    Ok(())
}

fn validate_prefix(field: &str, prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        bail!("{} must not be empty", field);
    }
    if !prefix.ends_with('/') {
        bail!("{} must end with '/', got '{}'", field, prefix);
    }
    if prefix.starts_with('/') {
        bail!("{} must not start with '/', got '{}'", field, prefix);
    }
    Ok(())
}

fn validate_function_config(config: &FunctionConfig) -> Result<()> {
    if config.handler.trim().is_empty() {
        bail!("function.handler must not be empty");
    }
    if config.runtime.trim().is_empty() {
        bail!("function.runtime must not be empty");
    }
    if config.key_suffix.is_empty() {
        bail!("function.key_suffix must not be empty");
    }
    if !EVENT_TYPES.contains(&config.event.as_str()) {
        bail!("function.event must be an S3 event name, got '{}'", config.event);
    }
    if config.policy_name.trim().is_empty() {
        bail!("function.policy_name must not be empty");
    }

    if !config.key_suffix.starts_with('.') {
        warn!(
            key_suffix = %config.key_suffix,
            "function.key_suffix does not start with '.'; it will match any key ending in it"
        );
    }

    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        bail!("logging.level must not be empty");
    }
    if let Err(e) = EnvFilter::try_new(&config.level) {
        bail!("logging.level '{}' is not a valid filter: {}", config.level, e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_parameter_defaults() {
        assert!(validate_parameter_defaults(&ParameterDefaults::default()).is_ok());

        let no_slash = ParameterDefaults {
            input_key_prefix: "stg/input-gz".to_string(),
            ..ParameterDefaults::default()
        };
        assert!(validate_parameter_defaults(&no_slash).is_err());

        let bad_memory = ParameterDefaults {
            memory_size: 500,
            ..ParameterDefaults::default()
        };
        assert!(validate_parameter_defaults(&bad_memory).is_err());

        let too_much_memory = ParameterDefaults {
            memory_size: 1600,
            ..ParameterDefaults::default()
        };
        assert!(validate_parameter_defaults(&too_much_memory).is_err());

        let long_timeout = ParameterDefaults {
            timeout: 901,
            ..ParameterDefaults::default()
        };
        assert!(validate_parameter_defaults(&long_timeout).is_err());

        let max_timeout = ParameterDefaults {
            timeout: 900,
            memory_size: 1536,
            ..ParameterDefaults::default()
        };
        assert!(validate_parameter_defaults(&max_timeout).is_ok());
    }

    #[test]
    fn test_validate_function_config() {
        assert!(validate_function_config(&FunctionConfig::default()).is_ok());

        let no_handler = FunctionConfig {
            handler: String::new(),
            ..FunctionConfig::default()
        };
        assert!(validate_function_config(&no_handler).is_err());

        let bad_event = FunctionConfig {
            event: "ObjectCreated".to_string(),
            ..FunctionConfig::default()
        };
        assert!(validate_function_config(&bad_event).is_err());

        // Legal, only warns
        let odd_suffix = FunctionConfig {
            key_suffix: "gz".to_string(),
            ..FunctionConfig::default()
        };
        assert!(validate_function_config(&odd_suffix).is_ok());
    }

    #[test]
    fn test_validate_logging_config() {
        assert!(validate_logging_config(&LoggingConfig::default()).is_ok());

        let directive = LoggingConfig {
            level: "s3_lambda_stack=debug,warn".to_string(),
            ..LoggingConfig::default()
        };
        assert!(validate_logging_config(&directive).is_ok());

        let garbage = LoggingConfig {
            level: "s3_lambda_stack=loud".to_string(),
            ..LoggingConfig::default()
        };
        let err = validate_logging_config(&garbage).unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_validate_template_config() {
        let long = TemplateConfig {
            description: "x".repeat(1025),
            ..TemplateConfig::default()
        };
        assert!(validate_template_config(&long).is_err());
    }
}
