//! CLI command implementations.

pub mod expand;
pub mod init;
pub mod stitch;
pub mod templates;

pub use expand::{expand_file, parse_var, ExpandOptions};
pub use init::init_project;
pub use stitch::{stitch_script, StitchOptions};
pub use templates::list_templates;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Write a finished document to `output`, or to stdout when absent
pub(crate) fn write_output(document: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, document).with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("Wrote {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(document.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
