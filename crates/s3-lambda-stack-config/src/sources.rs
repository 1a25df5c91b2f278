// Configuration source loading.
//
// Priority order:
// 1. Environment variables (S3_LAMBDA_STACK_* prefix, logging only)
// 2. Config file given explicitly (--config)
// 3. Built-in defaults
//
// There is no implicit config file lookup: the output depends only on what the
// caller passes in.

use crate::env_overrides::{self, EnvSource, ENV_PREFIX};
use crate::GeneratorConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;
use tracing::debug;

pub fn load_config<E: EnvSource>(path: Option<&Path>, env: &E) -> Result<GeneratorConfig> {
    let mut config = match path {
        Some(path) => load_from_file_path(path)?,
        None => GeneratorConfig::default(),
    };

    env_overrides::apply_env_overrides(&mut config, env)?;
    config.validate()?;
    Ok(config)
}

fn load_from_file_path(path: &Path) -> Result<GeneratorConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse_toml(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// Missing sections and keys fall back to their defaults
pub fn parse_toml(content: &str) -> Result<GeneratorConfig> {
    let config: GeneratorConfig = toml::from_str(content)?;
    Ok(config)
}

pub(crate) struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }
}
