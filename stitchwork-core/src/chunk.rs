//! Chunk header detection and merging into a host template.
//!
//! A script is split into chunks by header lines such as
//! `# ---- setup, echo=FALSE ----`. The host template holds exactly one line
//! containing the insertion marker `%sCHUNK_LABEL_HERE`; with the label token
//! removed that line becomes a `%s` format used to stamp every chunk header,
//! and the stamped script replaces the marker line.

use regex::Regex;
use thiserror::Error;

/// Reserved token naming the label slot in a template line
pub const LABEL_TOKEN: &str = "CHUNK_LABEL_HERE";
/// Prefix of a chunk header line
pub const DEFAULT_HEADER_MARKER: &str = "# ----";
/// Label given to a script with no headers at all
pub const DEFAULT_LABEL: &str = "auto-report";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("Wrong template: expected exactly one line containing {marker:?}, found {found}")]
    Template { marker: String, found: usize },

    #[error("Invalid chunk header marker: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ChunkError>;

/// A classified chunk header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkHeader {
    /// First comma-separated field, trimmed; may be empty
    pub label: String,
    /// Everything after the first comma, trimmed
    pub options: Option<String>,
}

/// Single-argument `%s` format derived from the template's marker line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFormat {
    format: String,
}

impl HeaderFormat {
    /// Remove the first `label_token` from `line`
    pub fn from_line(line: &str, label_token: &str) -> Self {
        Self {
            format: line.replacen(label_token, "", 1),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.format
    }

    /// Substitute `arg` for the first `%s`; `%%` yields a literal percent
    pub fn stamp(&self, arg: &str) -> String {
        let mut out = String::with_capacity(self.format.len() + arg.len());
        let mut used = false;
        let mut chars = self.format.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.peek() {
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                Some('s') if !used => {
                    chars.next();
                    out.push_str(arg);
                    used = true;
                }
                _ => out.push('%'),
            }
        }
        out
    }
}

/// Merges script lines into a host template
#[derive(Debug, Clone)]
pub struct ChunkMerger {
    header_marker: String,
    header_pattern: Regex,
    label_token: String,
    default_label: String,
    keep_options: bool,
}

impl ChunkMerger {
    pub fn new() -> Self {
        Self {
            header_marker: DEFAULT_HEADER_MARKER.to_string(),
            header_pattern: header_pattern(DEFAULT_HEADER_MARKER)
                .expect("default header marker is valid"),
            label_token: LABEL_TOKEN.to_string(),
            default_label: DEFAULT_LABEL.to_string(),
            keep_options: false,
        }
    }

    pub fn with_header_marker(mut self, marker: impl Into<String>) -> Result<Self> {
        let marker = marker.into();
        self.header_pattern = header_pattern(&marker)?;
        self.header_marker = marker;
        Ok(self)
    }

    pub fn with_label_token(mut self, token: impl Into<String>) -> Self {
        self.label_token = token.into();
        self
    }

    pub fn with_default_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = label.into();
        self
    }

    /// Stamp `label, options` instead of the bare label
    pub fn with_keep_options(mut self, keep: bool) -> Self {
        self.keep_options = keep;
        self
    }

    pub fn header_marker(&self) -> &str {
        &self.header_marker
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    pub fn keep_options(&self) -> bool {
        self.keep_options
    }

    /// The line a template must contain exactly once
    pub fn insertion_marker(&self) -> String {
        format!("%s{}", self.label_token)
    }

    /// Parse a single line as a chunk header
    pub fn parse_header(&self, line: &str) -> Option<ChunkHeader> {
        let caps = self.header_pattern.captures(line)?;
        let body = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let (label, options) = match body.split_once(',') {
            Some((label, rest)) => {
                let rest = rest.trim();
                (label, (!rest.is_empty()).then(|| rest.to_string()))
            }
            None => (body, None),
        };
        Some(ChunkHeader {
            label: label.trim().to_string(),
            options,
        })
    }

    /// Every header line in `lines` with its index
    pub fn headers<S: AsRef<str>>(&self, lines: &[S]) -> Vec<(usize, ChunkHeader)> {
        lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| self.parse_header(line.as_ref()).map(|h| (i, h)))
            .collect()
    }

    /// Locate the template's marker line and derive the header format
    pub fn header_format<T: AsRef<str>>(&self, template: &[T]) -> Result<(usize, HeaderFormat)> {
        let marker = self.insertion_marker();
        let found: Vec<usize> = template
            .iter()
            .enumerate()
            .filter(|(_, line)| line.as_ref().contains(&marker))
            .map(|(i, _)| i)
            .collect();

        match found.as_slice() {
            [index] => Ok((
                *index,
                HeaderFormat::from_line(template[*index].as_ref(), &self.label_token),
            )),
            _ => Err(ChunkError::Template {
                marker,
                found: found.len(),
            }),
        }
    }

    fn stamp_argument(&self, header: &ChunkHeader) -> String {
        match (&header.options, self.keep_options) {
            (Some(options), true) => format!("{}, {}", header.label, options),
            _ => header.label.clone(),
        }
    }

    /// Stamp the chunk headers in `source` and splice it into `template`.
    ///
    /// The result has one entry per template line; the marker line is
    /// replaced by the whole stamped script joined with `\n`.
    pub fn merge<S, T>(&self, source: &[S], template: &[T]) -> Result<Vec<String>>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let (index, format) = self.header_format(template)?;
        let headers = self.headers(source);
        tracing::debug!("Found {} chunk header(s) in {} line(s)", headers.len(), source.len());

        let mut lines: Vec<String> = source.iter().map(|l| l.as_ref().to_string()).collect();
        match headers.first() {
            None => lines.insert(0, format.stamp(&self.default_label)),
            Some((first, _)) => {
                let first = *first;
                for (i, header) in &headers {
                    lines[*i] = format.stamp(&self.stamp_argument(header));
                }
                if first != 0 {
                    lines.insert(0, format.stamp(""));
                }
            }
        }

        let body = lines.join("\n");
        Ok(template
            .iter()
            .enumerate()
            .map(|(i, line)| {
                if i == index {
                    body.clone()
                } else {
                    line.as_ref().to_string()
                }
            })
            .collect())
    }
}

impl Default for ChunkMerger {
    fn default() -> Self {
        Self::new()
    }
}

fn header_pattern(marker: &str) -> Result<Regex> {
    if marker.trim().is_empty() {
        return Err(ChunkError::Config("header marker must not be blank".to_string()));
    }
    let source = format!(r"^{}-*(?:\s+(.*?))?-*\s*$", regex::escape(marker));
    Regex::new(&source).map_err(|e| ChunkError::Config(e.to_string()))
}

/// Merge with default settings and the given header marker
pub fn merge<S, T>(source: &[S], template: &[T], header_marker: &str) -> Result<Vec<String>>
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    ChunkMerger::new().with_header_marker(header_marker)?.merge(source, template)
}
