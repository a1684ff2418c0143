//! Title and author comments at the top of a script.

use regex::Regex;
use stitchwork_types::Environment;
use std::sync::OnceLock;

static TITLE_REGEX: OnceLock<Regex> = OnceLock::new();
static AUTHOR_REGEX: OnceLock<Regex> = OnceLock::new();

fn title_regex() -> &'static Regex {
    TITLE_REGEX.get_or_init(|| Regex::new(r"^#+ *title:").unwrap())
}

fn author_regex() -> &'static Regex {
    AUTHOR_REGEX.get_or_init(|| Regex::new(r"^#+ *author:").unwrap())
}

/// Document metadata read from leading comment lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none()
    }

    /// Variables for template expansion: `title` and `author` when present
    pub fn to_environment(&self) -> Environment {
        let mut env = Environment::new();
        if let Some(title) = &self.title {
            env.set("title", title.as_str());
        }
        if let Some(author) = &self.author {
            env.set("author", author.as_str());
        }
        env
    }
}

impl From<Metadata> for Environment {
    fn from(metadata: Metadata) -> Self {
        metadata.to_environment()
    }
}

fn take_field<'a, S: AsRef<str>>(lines: &'a [S], pattern: &Regex) -> Option<(String, &'a [S])> {
    let (first, rest) = lines.split_first()?;
    let found = pattern.find(first.as_ref())?;
    let value = first.as_ref()[found.end()..].trim().to_string();
    Some((value, rest))
}

/// Strip a leading `# title:` line, then a leading `# author:` line.
///
/// ```
/// use stitchwork_core::metadata::strip_metadata;
///
/// let lines = ["#' title: Sales", "#' author: Ada", "x <- 1"];
/// let (meta, rest) = strip_metadata(&lines);
/// assert_eq!(meta.title, None);
/// assert_eq!(rest.len(), 3);
///
/// let lines = ["# title: Sales", "## author: Ada", "x <- 1"];
/// let (meta, rest) = strip_metadata(&lines);
/// assert_eq!(meta.title.as_deref(), Some("Sales"));
/// assert_eq!(meta.author.as_deref(), Some("Ada"));
/// assert_eq!(rest, ["x <- 1"]);
/// ```
pub fn strip_metadata<S: AsRef<str>>(lines: &[S]) -> (Metadata, &[S]) {
    let mut metadata = Metadata::default();
    let mut rest = lines;

    if let Some((title, remaining)) = take_field(rest, title_regex()) {
        metadata.title = Some(title);
        rest = remaining;
    }
    if let Some((author, remaining)) = take_field(rest, author_regex()) {
        metadata.author = Some(author);
        rest = remaining;
    }

    if !metadata.is_empty() {
        tracing::debug!("Read script metadata: {:?}", metadata);
    }
    (metadata, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchwork_types::Value;

    #[test]
    fn test_author_without_title() {
        let lines = ["# author: Someone", "1 + 1"];
        let (meta, rest) = strip_metadata(&lines);
        assert_eq!(meta.title, None);
        assert_eq!(meta.author.as_deref(), Some("Someone"));
        assert_eq!(rest, ["1 + 1"]);
    }

    #[test]
    fn test_author_before_title_only_takes_author() {
        let lines = ["# author: A", "# title: T"];
        let (meta, rest) = strip_metadata(&lines);
        assert_eq!(meta.author.as_deref(), Some("A"));
        assert_eq!(meta.title, None);
        assert_eq!(rest, ["# title: T"]);
    }

    #[test]
    fn test_metadata_must_lead() {
        let lines = ["x <- 1", "# title: Late"];
        let (meta, rest) = strip_metadata(&lines);
        assert!(meta.is_empty());
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let lines: [&str; 0] = [];
        let (meta, rest) = strip_metadata(&lines);
        assert!(meta.is_empty());
        assert!(rest.is_empty());
    }

    #[test]
    fn test_environment() {
        let meta = Metadata {
            title: Some("Report".to_string()),
            author: None,
        };
        let env: Environment = meta.into();
        assert_eq!(env.get("title"), Some(&Value::text("Report")));
        assert!(!env.contains("author"));
    }
}
