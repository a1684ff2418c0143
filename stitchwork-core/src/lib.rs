//! # stitchwork-core
//!
//! Core library for stitchwork.
//!
//! Two transforms sit at the center: [`expand`] replaces delimiter-marked
//! tags in text with the values of the expressions inside them, and
//! [`chunk`] stamps labeled chunk headers in a script and splices the result
//! into a host template. [`pipeline`] composes them with configuration,
//! script metadata and the built-in templates.

pub mod chunk;
pub mod config;
pub mod expand;
pub mod metadata;
pub mod pipeline;
pub mod templates;

pub use chunk::{merge, ChunkError, ChunkHeader, ChunkMerger, HeaderFormat};
pub use config::{ChunkConfig, Config, ConfigError};
pub use expand::{
    expand, expand_with_env, BoxError, Delimiters, Evaluator, ExpandError, Expander, ExprEvaluator,
    TagMatch,
};
pub use metadata::{strip_metadata, Metadata};
pub use pipeline::{PipelineError, StitchPipeline};
pub use templates::{builtin, BuiltinTemplate, TemplateSource, BUILTIN_TEMPLATES};

pub use stitchwork_types::{Environment, Scope, Span, Value};
