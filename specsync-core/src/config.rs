//! Run configuration (`specsync.yaml`).
//!
//! Every field has a default, so an absent file at the default path yields a
//! working configuration for the reference deployment. An explicit `--config`
//! path that does not exist is an error.
//!
//! ```yaml
//! repository: digital-land/specification
//! base_branch: main
//! schema:
//!   path: src/specifications/schema.yml
//!   format: order
//! unknown_types: fail
//! envelope: closed
//! mappings:
//!   - source: data/collections/specifications/brownfield-land.yml
//!     destination: content/specification/brownfield-land.md
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Envelope, FileMapping, SchemaFormat, UnknownTypePolicy};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "specsync.yaml";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Where the ordering schema lives and how to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaSource {
    pub path: PathBuf,
    pub format: SchemaFormat,
}

impl Default for SchemaSource {
    fn default() -> Self {
        Self {
            path: PathBuf::from("src/specifications/schema.yml"),
            format: SchemaFormat::Order,
        }
    }
}

/// Tera templates for names and messages sent to the remote.
///
/// Available variables: `timestamp` (all), `path` and `record_type` (commit
/// messages only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Templates {
    pub branch: String,
    pub pr_title: String,
    pub pr_body: String,
    pub commit_create: String,
    pub commit_update: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            branch: "mini-cms/update-specifications-{{ timestamp }}".to_owned(),
            pr_title: "[Mini CMS] Update specifications {{ timestamp }}".to_owned(),
            pr_body: "This PR updates the specifications based on the latest changes from the Mini CMS."
                .to_owned(),
            commit_create: "Create {{ path }}".to_owned(),
            commit_update: "Update {{ path }}".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// SyncConfig
// ---------------------------------------------------------------------------

/// Root of `specsync.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// `owner/name` of the publishing repository.
    pub repository: String,
    pub base_branch: String,
    pub api_url: String,
    /// Environment variable holding the API token.
    pub token_env: String,
    /// Per-request timeout. Unset means requests may block indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Top-level key of the source document holding the record.
    pub payload_key: String,
    pub schema: SchemaSource,
    pub unknown_types: UnknownTypePolicy,
    pub envelope: Envelope,
    pub templates: Templates,
    pub mappings: Vec<FileMapping>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            repository: "digital-land/specification".to_owned(),
            base_branch: "main".to_owned(),
            api_url: "https://api.github.com".to_owned(),
            token_env: "GITHUB_TOKEN".to_owned(),
            timeout_secs: None,
            payload_key: "data".to_owned(),
            schema: SchemaSource::default(),
            unknown_types: UnknownTypePolicy::default(),
            envelope: Envelope::default(),
            templates: Templates::default(),
            mappings: FileMapping::reference(),
        }
    }
}

impl SyncConfig {
    /// Load and validate the config at `path`.
    ///
    /// Returns `ConfigError::NotFound` if absent, `ConfigError::Parse` (with
    /// path + line context) if malformed YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: SyncConfig = serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// `load` when `path` is given, otherwise [`DEFAULT_CONFIG_PATH`] under
    /// `root` if present, otherwise defaults.
    pub fn resolve(root: &Path, path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = root.join(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner_and_name().is_none() {
            return Err(ConfigError::Invalid(format!(
                "repository '{}' must be of the form owner/name",
                self.repository
            )));
        }
        if self.base_branch.trim().is_empty() {
            return Err(ConfigError::Invalid("base_branch must not be empty".into()));
        }
        if self.payload_key.is_empty() {
            return Err(ConfigError::Invalid("payload_key must not be empty".into()));
        }
        if self.mappings.is_empty() {
            return Err(ConfigError::Invalid("mappings must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for m in &self.mappings {
            if !seen.insert(m.destination.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "destination '{}' is mapped more than once",
                    m.destination
                )));
            }
        }
        Ok(())
    }

    /// `("digital-land", "specification")` for `digital-land/specification`.
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        let (owner, name) = self.repository.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some((owner, name))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
