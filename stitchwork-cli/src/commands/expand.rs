//! Expand command implementation.

use super::write_output;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use stitchwork_core::{Config, Environment, StitchPipeline, Value};

pub struct ExpandOptions {
    pub vars: Vec<(String, String)>,
    pub delimiters: Option<Vec<String>>,
    pub output: Option<PathBuf>,
}

/// Parse a `NAME=VALUE` command-line binding
pub fn parse_var(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

/// Expand the tags in `file` and write the result
pub fn expand_file(config_path: &Path, file: &Path, opts: ExpandOptions) -> Result<()> {
    let mut config = Config::load(config_path).context("Failed to load configuration")?;
    if let Some(delimiters) = opts.delimiters {
        config.delimiters = delimiters;
    }
    let pipeline = StitchPipeline::new(config).context("Invalid configuration")?;

    // Values are typed the way a literal would be: numbers, TRUE/FALSE, else text
    let vars: Environment = opts
        .vars
        .iter()
        .map(|(name, raw)| (name.as_str(), Value::infer(raw)))
        .collect();

    let document = pipeline
        .expand_file(file, &vars)
        .with_context(|| format!("Failed to expand {:?}", file))?;
    write_output(&document, opts.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var() {
        assert_eq!(parse_var("n=3"), Ok(("n".to_string(), "3".to_string())));
        assert_eq!(parse_var("eq=a=b"), Ok(("eq".to_string(), "a=b".to_string())));
        assert_eq!(parse_var("empty="), Ok(("empty".to_string(), String::new())));
        assert!(parse_var("novalue").is_err());
        assert!(parse_var("=x").is_err());
    }
}
