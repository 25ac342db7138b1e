//! Domain types for specsync.
//!
//! All path fields use `PathBuf`; destination paths are repository-relative
//! and kept as `String` because they are sent to the remote API verbatim.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a specification record type
/// (e.g. `article-4-direction`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordType(pub String);

impl RecordType {
    /// Derive the record type from a source path: the file name without its
    /// extension.
    ///
    /// `data/collections/specifications/brownfield-land.yml` → `brownfield-land`
    pub fn from_source(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .unwrap_or_else(|| path.as_os_str())
            .to_string_lossy()
            .into_owned();
        Self(stem)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordType {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What the sync driver does with a record type the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownTypePolicy {
    /// Abort the run with an error naming the record type.
    #[default]
    Fail,
    /// Publish the payload unchanged, in its original key order.
    PassThrough,
}

/// Frontmatter delimiter layout of the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Envelope {
    /// `---` before and after the body.
    #[default]
    Closed,
    /// Leading `---` only.
    Open,
}

/// Which document shape the schema file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchemaFormat {
    /// `specifications: { <type>: { order: [...] } }`
    #[default]
    Order,
    /// Headless-CMS configuration whose collection file fields double as the
    /// ordering schema.
    Cms,
}

impl fmt::Display for SchemaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaFormat::Order => write!(f, "order"),
            SchemaFormat::Cms => write!(f, "cms"),
        }
    }
}

// ---------------------------------------------------------------------------
// File mapping
// ---------------------------------------------------------------------------

/// One (source → destination) publishing pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileMapping {
    /// Source YAML document, relative to the run root.
    pub source: PathBuf,
    /// Destination path inside the remote repository.
    pub destination: String,
    /// Overrides the record type otherwise derived from the source file name.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<RecordType>,
}

const REFERENCE_TYPES: &[&str] = &[
    "article-4-direction",
    "brownfield-land",
    "conservation-area",
    "listed-building",
    "tree-preservation-order",
];

impl FileMapping {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            record_type: None,
        }
    }

    /// The record type used for schema lookup.
    pub fn record_type(&self) -> RecordType {
        self.record_type
            .clone()
            .unwrap_or_else(|| RecordType::from_source(&self.source))
    }

    /// The built-in publishing table: one entry per specification.
    pub fn reference() -> Vec<FileMapping> {
        REFERENCE_TYPES
            .iter()
            .map(|name| {
                FileMapping::new(
                    format!("data/collections/specifications/{name}.yml"),
                    format!("content/specification/{name}.md"),
                )
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_type_from_source_strips_dir_and_extension() {
        let t = RecordType::from_source(Path::new(
            "data/collections/specifications/article-4-direction.yml",
        ));
        assert_eq!(t.as_str(), "article-4-direction");
        assert_eq!(
            RecordType::from_source(Path::new("brownfield-land.yml")).to_string(),
            "brownfield-land"
        );
    }

    #[test]
    fn explicit_type_overrides_file_stem() {
        let mut m = FileMapping::new("a/b/c.yml", "out/c.md");
        assert_eq!(m.record_type(), RecordType::from("c"));
        m.record_type = Some(RecordType::from("conservation-area"));
        assert_eq!(m.record_type(), RecordType::from("conservation-area"));
    }

    #[test]
    fn reference_table_has_five_pairs() {
        let table = FileMapping::reference();
        assert_eq!(table.len(), 5);
        assert_eq!(
            table[0].source,
            PathBuf::from("data/collections/specifications/article-4-direction.yml")
        );
        assert_eq!(table[4].destination, "content/specification/tree-preservation-order.md");
    }

    #[test]
    fn policy_serde_uses_kebab_case() {
        let p: UnknownTypePolicy = serde_yaml::from_str("pass-through").expect("parse");
        assert_eq!(p, UnknownTypePolicy::PassThrough);
        assert_eq!(UnknownTypePolicy::default(), UnknownTypePolicy::Fail);
    }
}
