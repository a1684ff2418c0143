//! End-to-end flows built from the expander and the chunk merger
//!
//! Flow for `stitch`: script → metadata → template expansion → chunk merge
//!
//! Flow for `expand`: text → tag expansion
//!
//! Reading inputs is the only I/O here; where the result goes is up to the
//! caller.

use crate::chunk::{ChunkError, ChunkMerger};
use crate::config::{Config, ConfigError};
use crate::expand::{expand_with_env, Delimiters, ExpandError};
use crate::metadata::strip_metadata;
use crate::templates::TemplateSource;
use std::path::{Path, PathBuf};
use stitchwork_types::Environment;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Expansion failed: {0}")]
    Expand(#[from] ExpandError),

    #[error("Merge failed: {0}")]
    Chunk(#[from] ChunkError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Stitching and expansion driven by one [`Config`]
pub struct StitchPipeline {
    config: Config,
    delimiters: Delimiters,
    merger: ChunkMerger,
}

impl StitchPipeline {
    pub fn new(config: Config) -> Result<Self> {
        let delimiters = config.delimiters()?;
        let merger = config.chunk_merger()?;
        Ok(Self {
            config,
            delimiters,
            merger,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    pub fn merger(&self) -> &ChunkMerger {
        &self.merger
    }

    /// Replace the chunk merger, e.g. after command-line overrides
    pub fn with_merger(mut self, merger: ChunkMerger) -> Self {
        self.merger = merger;
        self
    }

    /// Expand tags in `text`. `vars` shadow the configured variables.
    pub fn expand_text(&self, text: &str, vars: &Environment) -> Result<String> {
        let out = expand_with_env(
            text,
            &self.delimiters,
            vars.clone(),
            Some(&self.config.variables),
        )?;
        Ok(out)
    }

    pub fn expand_file(&self, path: &Path, vars: &Environment) -> Result<String> {
        tracing::info!("Expanding {:?}", path);
        let text = read_file(path)?;
        self.expand_text(&text, vars)
    }

    /// Merge `script` into `template` and return the finished document.
    ///
    /// Leading `title:`/`author:` comments are removed from the script and
    /// made available to the template's tags alongside the configured
    /// variables and `vars`. The template is expanded before the script is
    /// spliced in, so script text is never treated as tags.
    pub fn stitch_text(&self, script: &str, template: &str, vars: &Environment) -> Result<String> {
        let lines: Vec<&str> = script.lines().collect();
        let (metadata, body) = strip_metadata(&lines);
        if body.is_empty() {
            tracing::warn!("Script has no content after its metadata lines");
        }

        let mut ambient = self.config.variables.clone();
        for env in [&metadata.to_environment(), vars] {
            ambient.extend(env.iter().map(|(name, value)| (name, value.clone())));
        }

        let expanded =
            expand_with_env(template, &self.delimiters, Environment::new(), Some(&ambient))?;
        let template_lines: Vec<&str> = expanded.lines().collect();

        let merged = self.merger.merge(body, &template_lines)?;
        tracing::info!(
            "Stitched {} script line(s) into {} template line(s)",
            body.len(),
            template_lines.len()
        );

        let mut document = merged.join("\n");
        if expanded.ends_with('\n') {
            document.push('\n');
        }
        Ok(document)
    }

    /// Stitch a script file into the configured template
    pub fn stitch_file(&self, path: &Path) -> Result<String> {
        self.stitch_file_with(path, &self.config.template_source())
    }

    /// Stitch a script file into an explicit template
    pub fn stitch_file_with(&self, path: &Path, template: &TemplateSource) -> Result<String> {
        tracing::info!("Stitching {:?} with {}", path, template.describe());
        let script = read_file(path)?;
        let template_text = match template {
            TemplateSource::File(template_path) => read_file(template_path)?,
            TemplateSource::Builtin(builtin) => builtin.source.to_string(),
        };
        self.stitch_text(&script, &template_text, &Environment::new())
    }
}
