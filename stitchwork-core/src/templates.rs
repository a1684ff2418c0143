//! Built-in host templates and template lookup.

use std::path::{Path, PathBuf};

/// A host template compiled into the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinTemplate {
    pub name: &'static str,
    /// File extension of documents produced from this template
    pub extension: &'static str,
    pub description: &'static str,
    pub source: &'static str,
}

pub const BUILTIN_TEMPLATES: &[BuiltinTemplate] = &[
    BuiltinTemplate {
        name: "markdown",
        extension: "Rmd",
        description: "R Markdown with fenced chunks",
        source: include_str!("templates/markdown.md"),
    },
    BuiltinTemplate {
        name: "latex",
        extension: "Rnw",
        description: "LaTeX with Sweave-style chunks",
        source: include_str!("templates/latex.tex"),
    },
    BuiltinTemplate {
        name: "html",
        extension: "Rhtml",
        description: "HTML with comment-delimited chunks",
        source: include_str!("templates/html.html"),
    },
];

/// Look up a built-in template by name
pub fn builtin(name: &str) -> Option<&'static BuiltinTemplate> {
    BUILTIN_TEMPLATES.iter().find(|t| t.name == name)
}

/// Where a host template comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Builtin(&'static BuiltinTemplate),
    File(PathBuf),
}

impl TemplateSource {
    /// Resolve `name` to a built-in template, or else a path relative to `base`
    pub fn resolve(name: &str, base: Option<&Path>) -> Self {
        if let Some(template) = builtin(name) {
            return TemplateSource::Builtin(template);
        }
        let path = Path::new(name);
        match base {
            Some(base) if path.is_relative() => TemplateSource::File(base.join(path)),
            _ => TemplateSource::File(path.to_path_buf()),
        }
    }

    pub fn load(&self) -> std::io::Result<String> {
        match self {
            TemplateSource::Builtin(template) => Ok(template.source.to_string()),
            TemplateSource::File(path) => std::fs::read_to_string(path),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            TemplateSource::Builtin(template) => format!("built-in template '{}'", template.name),
            TemplateSource::File(path) => format!("template {:?}", path),
        }
    }
}
