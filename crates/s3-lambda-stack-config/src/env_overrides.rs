use super::{GeneratorConfig, LogFormat};
use anyhow::Result;

pub const ENV_PREFIX: &str = "S3_LAMBDA_STACK_";

/// Abstraction over environment-variable lookups so tests can supply their
/// own source of overrides.
pub trait EnvSource {
    /// Get a variable by its name without the S3_LAMBDA_STACK_ prefix
    fn get(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides to the logging section.
///
/// The generated document is never influenced by the environment, and an
/// unrecognised log format falls back to text rather than failing the load.
pub fn apply_env_overrides<E: EnvSource>(config: &mut GeneratorConfig, env: &E) -> Result<()> {
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.logging.format = match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
    }
    Ok(())
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key).filter(|val| !val.trim().is_empty())
}
