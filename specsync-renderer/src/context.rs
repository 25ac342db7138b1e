//! Message context — serializable payload for the Tera message templates.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use specsync_core::RecordType;

use crate::error::RenderError;

/// Run timestamp layout shared by branch names and titles:
/// `2024-05-01--13-45-09`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d--%H-%M-%S";

pub fn format_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Variables visible to every template. `path` and `record_type` are only
/// set for commit messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageContext {
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
}

impl MessageContext {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            path: None,
            record_type: None,
        }
    }

    /// Context for the commit that writes `path`.
    pub fn for_file(&self, path: &str, record_type: &RecordType) -> Self {
        Self {
            timestamp: self.timestamp.clone(),
            path: Some(path.to_owned()),
            record_type: Some(record_type.to_string()),
        }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
