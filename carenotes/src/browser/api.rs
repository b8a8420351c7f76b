use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    db::DB,
    notes::{handlers, Note, NoteId, NoteInput},
};

use super::Result;

pub type SharedNoteApi = Arc<dyn NoteApi>;

/// What the browser needs from the note store.
#[async_trait]
pub trait NoteApi: Send + Sync {
    /// Raw list entries, in store order. Entries are checked while rendering.
    async fn list(&self, resident_name: Option<String>) -> Result<Vec<Value>>;

    async fn create(&self, input: NoteInput) -> Result<Note>;

    async fn update(&self, id: NoteId, input: NoteInput) -> Result<Note>;

    /// Returns the store's confirmation message.
    async fn delete(&self, id: NoteId) -> Result<String>;
}

/// Calls the store in-process on the shared connection.
#[derive(Clone)]
pub struct LocalNotes {
    db: DB,
}

impl LocalNotes {
    pub fn new(db: DB) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NoteApi for LocalNotes {
    async fn list(&self, resident_name: Option<String>) -> Result<Vec<Value>> {
        let notes = handlers::find_notes(resident_name, &self.db).await?;
        let records = notes
            .into_iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    async fn create(&self, input: NoteInput) -> Result<Note> {
        Ok(handlers::create_note(input, &self.db).await?)
    }

    async fn update(&self, id: NoteId, input: NoteInput) -> Result<Note> {
        Ok(handlers::update_note(id, input, &self.db).await?)
    }

    async fn delete(&self, id: NoteId) -> Result<String> {
        Ok(handlers::delete_note(id, &self.db).await?.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{browser::Error, db::init_test_db};

    #[tokio::test]
    async fn local_notes_round_trip_through_the_store() {
        let api = LocalNotes::new(init_test_db().await.unwrap());

        let note = api
            .create(NoteInput {
                resident_name: "Alice Johnson".into(),
                author_name: "Nurse Smith".into(),
                content: "Meds given".into(),
                date_time: "2024-09-17T10:30:00Z".into(),
            })
            .await
            .unwrap();

        let records = api.list(None).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], note.id);
        assert_eq!(records[0]["residentName"], "Alice Johnson");

        assert_eq!(api.delete(note.id).await.unwrap(), "Note 1 deleted successfully.");

        let error = api.delete(note.id).await.unwrap_err();
        assert!(matches!(error, Error::Store(crate::Error::NotFound(_))));
    }
}
