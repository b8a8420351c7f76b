use rusqlite::{params, Row};

use crate::{
    db::{self, DB},
    Error, Result,
};

use super::{DeleteNoteResponse, Note, NoteId, NoteInput};

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            resident_name: row.get(1)?,
            author_name: row.get(2)?,
            content: row.get(3)?,
            date_time: row.get(4)?,
        })
    }
}

/// Lists notes in insertion order, optionally only those of one resident (exact match).
pub async fn find_notes(resident_name: Option<String>, db: &DB) -> Result<Vec<Note>> {
    let notes = db
        .call(move |conn| {
            let notes = conn
                .prepare(
                    r#"SELECT id, resident_name, author_name, content, date_time FROM notes
                    WHERE ?1 IS NULL OR resident_name = ?1
                    ORDER BY id"#,
                )?
                .query_map(params![resident_name], |row| Note::try_from(row))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(notes)
        })
        .await
        .map_err(db::Error::from)
        .map_err(Error::from)?;

    tracing::debug!("found {} notes", notes.len());

    Ok(notes)
}

pub async fn create_note(input: NoteInput, db: &DB) -> Result<Note> {
    input.validate()?;
    let NoteInput {
        resident_name,
        author_name,
        content,
        date_time,
    } = input;

    let note = db
        .call(move |conn| {
            conn.query_row(
                r#"INSERT INTO notes (resident_name, author_name, content, date_time) VALUES (?, ?, ?, ?)
                RETURNING id, resident_name, author_name, content, date_time"#,
                params![resident_name, author_name, content, date_time],
                |row| Note::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(Error::from)?;

    tracing::info!("created note {}", note.id);

    Ok(note)
}

pub async fn update_note(note_id: NoteId, input: NoteInput, db: &DB) -> Result<Note> {
    input.validate()?;
    let NoteInput {
        resident_name,
        author_name,
        content,
        date_time,
    } = input;

    let note = db
        .call(move |conn| {
            conn.query_row(
                r#"UPDATE notes SET resident_name = ?, author_name = ?, content = ?, date_time = ?
                WHERE id = ?
                RETURNING id, resident_name, author_name, content, date_time"#,
                params![resident_name, author_name, content, date_time, note_id],
                |row| Note::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.not_found_message(format!("Note with ID {note_id} not found.")))
        .map_err(Error::from)?;

    tracing::info!("updated note {note_id}");

    Ok(note)
}

pub async fn delete_note(note_id: NoteId, db: &DB) -> Result<DeleteNoteResponse> {
    if note_id <= 0 {
        return Err(Error::Validation("Invalid note ID received".into()));
    }

    db.call(move |conn| {
        conn.query_row::<NoteId, _, _>("DELETE FROM notes WHERE id = ? RETURNING id", params![note_id], |row| {
            row.get(0)
        })
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message(format!("Note with ID {note_id} not found.")))
    .map_err(Error::from)?;

    tracing::info!("deleted note {note_id}");

    Ok(DeleteNoteResponse {
        message: format!("Note {note_id} deleted successfully."),
    })
}
