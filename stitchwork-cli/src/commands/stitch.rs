//! Stitch command implementation.

use super::write_output;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use stitchwork_core::{Config, StitchPipeline, TemplateSource};

pub struct StitchOptions {
    pub template: Option<String>,
    pub marker: Option<String>,
    pub keep_options: bool,
    pub output: Option<PathBuf>,
}

/// Stitch `script` into the configured (or overridden) template
pub fn stitch_script(config_path: &Path, script: &Path, opts: StitchOptions) -> Result<()> {
    let mut config = Config::load(config_path).context("Failed to load configuration")?;
    if let Some(marker) = opts.marker {
        config.chunk.header_marker = marker;
    }
    if opts.keep_options {
        config.chunk.keep_options = true;
    }

    // A template given on the command line is relative to the working directory
    let template = match opts.template.as_deref() {
        Some(name) => TemplateSource::resolve(name, None),
        None => config.template_source(),
    };

    let pipeline = StitchPipeline::new(config).context("Invalid configuration")?;
    let document = pipeline
        .stitch_file_with(script, &template)
        .with_context(|| format!("Failed to stitch {:?}", script))?;
    write_output(&document, opts.output.as_deref())
}
