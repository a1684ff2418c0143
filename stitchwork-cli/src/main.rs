//! # stitchwork CLI
//!
//! Command-line interface for tag expansion and chunk stitching.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stitchwork")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (optional; defaults apply when missing)
    #[arg(long, default_value = "stitchwork.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter stitchwork.yml
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Replace tags in a file with the values of their expressions
    Expand {
        /// File to expand
        file: PathBuf,

        /// Bind a variable for the tags (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = commands::parse_var)]
        vars: Vec<(String, String)>,

        /// Opening and closing delimiters
        #[arg(long, num_args = 2, value_names = ["OPEN", "CLOSE"], allow_hyphen_values = true)]
        delim: Option<Vec<String>>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stitch a script's chunks into a host template
    Stitch {
        /// Script to stitch
        script: PathBuf,

        /// Built-in template name or template path
        #[arg(long)]
        template: Option<String>,

        /// Prefix that marks chunk header lines
        #[arg(long, allow_hyphen_values = true)]
        marker: Option<String>,

        /// Carry chunk options into the stamped headers
        #[arg(long)]
        keep_options: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the built-in templates
    Templates {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for document output
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Expand {
            file,
            vars,
            delim,
            output,
        } => {
            let opts = commands::ExpandOptions {
                vars,
                delimiters: delim,
                output,
            };
            commands::expand_file(&cli.config, &file, opts)
        }
        Commands::Stitch {
            script,
            template,
            marker,
            keep_options,
            output,
        } => {
            let opts = commands::StitchOptions {
                template,
                marker,
                keep_options,
                output,
            };
            commands::stitch_script(&cli.config, &script, opts)
        }
        Commands::Templates { json } => commands::list_templates(json),
    }
}
