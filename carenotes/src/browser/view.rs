use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::notes::NoteId;

use super::{NoteApi, Result};

pub const ALL_RESIDENTS: &str = "All Residents";

/// A note as displayed in the list and in the edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCard {
    pub id: NoteId,
    pub resident_name: String,
    pub author_name: String,
    pub content: String,
    pub date_time: String,
}

impl NoteCard {
    /// `None` unless the entry carries a positive integer `id`.
    pub fn from_record(record: &Value) -> Option<Self> {
        let id = record.get("id").and_then(Value::as_i64).filter(|id| *id > 0)?;
        let text = |key: &str| record.get(key).and_then(Value::as_str).unwrap_or_default().to_string();

        Some(Self {
            id,
            resident_name: text("residentName"),
            author_name: text("authorName"),
            content: text("content"),
            date_time: text("dateTime"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Everything one render of the notes view needs.
#[derive(Debug, Default, Serialize)]
pub struct NoteBrowser {
    pub filter: Option<String>,
    pub notes: Vec<NoteCard>,
    pub options: Vec<FilterOption>,
    pub alert: Option<String>,
}

impl NoteBrowser {
    pub fn new(filter: Option<String>) -> Self {
        Self::from_records(filter, &[])
    }

    pub async fn load(api: &dyn NoteApi, filter: Option<String>) -> Result<Self> {
        let filter = filter.filter(|name| !name.is_empty());
        let records = api.list(filter.clone()).await?;

        Ok(Self::from_records(filter, &records))
    }

    /// Rebuilds the list and the filter options from scratch. Entries without a usable id are skipped.
    pub fn from_records(filter: Option<String>, records: &[Value]) -> Self {
        let filter = filter.filter(|name| !name.is_empty());

        let notes = records
            .iter()
            .filter_map(|record| {
                let card = NoteCard::from_record(record);
                if card.is_none() {
                    tracing::warn!(%record, "skipping note without a valid id");
                }
                card
            })
            .collect::<Vec<_>>();

        let options = resident_options(&notes, filter.as_deref());

        Self {
            filter,
            notes,
            options,
            alert: None,
        }
    }

    pub fn with_alert(mut self, message: impl Into<String>) -> Self {
        self.alert = Some(message.into());
        self
    }
}

fn resident_options(notes: &[NoteCard], filter: Option<&str>) -> Vec<FilterOption> {
    let residents = notes
        .iter()
        .map(|note| note.resident_name.as_str())
        .collect::<IndexSet<_>>();

    let all = FilterOption {
        value: String::new(),
        label: ALL_RESIDENTS.into(),
        selected: filter.is_none(),
    };

    std::iter::once(all)
        .chain(residents.into_iter().map(|name| FilterOption {
            value: name.into(),
            label: name.into(),
            selected: filter == Some(name),
        }))
        .collect()
}
