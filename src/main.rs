use anyhow::{bail, Context, Result};
use clap::Parser;
use s3_lambda_stack_config::{GeneratorConfig, OutputFormat};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Generate a CloudFormation template for an S3 bucket that triggers a Lambda function
#[derive(Parser)]
#[command(name = "s3-lambda-stack")]
#[command(version)]
#[command(about = "Generate a CloudFormation template for an S3 bucket that triggers a Lambda function", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format: json or yaml (overrides config file)
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Write the template to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Overwrite the output file if it already exists
    #[arg(long, requires = "output")]
    force: bool,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Step 1: Load base configuration (defaults, config file, env overrides)
    let mut config =
        GeneratorConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Step 2: Apply CLI overrides (highest priority)
    apply_cli_overrides(&mut config, &cli);

    // Step 3: Initialize tracing before validation so its warnings reach stderr
    s3_lambda_stack::init_tracing(&config.logging);
    config.validate()?;

    // Step 4: Build, validate and render; nothing is written on failure
    let rendered = s3_lambda_stack::generate(&config).context("Failed to generate template")?;

    // Step 5: Emit
    match cli.output.as_deref() {
        Some(path) => write_file(path, &rendered, cli.force),
        None => write_stdout(&rendered),
    }
}

fn apply_cli_overrides(config: &mut GeneratorConfig, cli: &Cli) {
    if let Some(format) = cli.format {
        config.template.format = format;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
}

fn write_stdout(rendered: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered).context("Failed to write template to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn write_file(path: &Path, rendered: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }
    std::fs::write(path, format!("{}\n", rendered))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote template");
    Ok(())
}
