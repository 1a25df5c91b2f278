// s3-lambda-stack - CloudFormation generator for an S3-triggered Lambda
//
// One pass: load configuration, declare parameters and resources, validate
// the graph, render it. Nothing is provisioned or executed.

use s3_lambda_stack_config::{GeneratorConfig, OutputFormat};
use s3_lambda_stack_template::{Format, Result};
use tracing::info;

mod init;

pub mod stack;

pub use init::init_tracing;
pub use stack::build_template;

/// Build and render the stack in the configured format
pub fn generate(config: &GeneratorConfig) -> Result<String> {
    let template = build_template(config)?;
    let rendered = template.render(render_format(config.template.format))?;
    info!(
        format = %config.template.format,
        bytes = rendered.len(),
        "Generated template"
    );
    Ok(rendered)
}

fn render_format(format: OutputFormat) -> Format {
    match format {
        OutputFormat::Json => Format::Json,
        OutputFormat::Yaml => Format::Yaml,
    }
}
