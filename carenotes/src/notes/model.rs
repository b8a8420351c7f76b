use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub type NoteId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub resident_name: String,
    pub author_name: String,
    pub content: String,
    pub date_time: String,
}

/// Body of create and update requests. Every field except `id` is replaceable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    pub resident_name: String,
    pub author_name: String,
    pub content: String,
    pub date_time: String,
}

impl NoteInput {
    pub fn validate(&self) -> Result<()> {
        if self.resident_name.trim().is_empty() {
            return Err(Error::Validation("residentName must not be empty".into()));
        }
        if self.author_name.trim().is_empty() {
            return Err(Error::Validation("authorName must not be empty".into()));
        }
        if !is_timestamp(&self.date_time) {
            return Err(Error::Validation(format!(
                "dateTime must be an ISO-8601 timestamp, got '{}'",
                self.date_time
            )));
        }
        Ok(())
    }
}

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];
const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// ISO-8601 date and time, seconds optional, with a `Z`, a `±hh[:]mm` offset or no zone.
fn is_timestamp(value: &str) -> bool {
    if DateTime::parse_from_rfc3339(value).is_ok() {
        return true;
    }
    if OFFSET_FORMATS
        .iter()
        .any(|format| DateTime::parse_from_str(value, format).is_ok())
    {
        return true;
    }

    let local = value.strip_suffix('Z').unwrap_or(value);
    LOCAL_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(local, format).is_ok())
}

#[derive(Debug, Default, Deserialize)]
pub struct ListNotesQuery {
    #[serde(rename = "residentName")]
    pub resident_name: Option<String>,
}

impl ListNotesQuery {
    /// An empty filter value means no filter.
    pub fn filter(self) -> Option<String> {
        self.resident_name.filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteNoteResponse {
    pub message: String,
}
