mod migrations;

use std::path::Path;

use rusqlite::params;
use tokio_rusqlite::Connection;

use migrations::{DEMO_NOTES, MIGRATIONS};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not_found")]
    NotFound(String),
    #[error(transparent)]
    TokioRusqlite(tokio_rusqlite::Error),
    #[error(transparent)]
    Rusqlite(rusqlite::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_found_message(self, message: impl Into<String>) -> Self {
        if matches!(self, Self::NotFound(_)) {
            return Self::NotFound(message.into());
        }
        self
    }
}

impl From<tokio_rusqlite::Error> for Error {
    fn from(error: tokio_rusqlite::Error) -> Self {
        match error {
            tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows) => Self::NotFound("Not found".into()),
            error => Self::TokioRusqlite(error),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound("Not found".into()),
            error => Self::Rusqlite(error),
        }
    }
}

pub type DB = Connection;

/// Opens (or creates) the notes database at `path` and brings the schema up to date.
pub async fn init_db(path: &str) -> Result<DB> {
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let conn = Connection::open(path).await?;

    conn.call(|conn| {
        MIGRATIONS
            .to_latest(conn)
            .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(())
    })
    .await?;

    tracing::debug!("database ready at {path}");

    Ok(conn)
}

#[cfg(test)]
pub async fn init_test_db() -> Result<DB> {
    let conn = Connection::open_in_memory().await?;

    conn.call(|conn| {
        MIGRATIONS
            .to_latest(conn)
            .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;

        Ok(())
    })
    .await?;

    Ok(conn)
}

/// Inserts the demonstration notes when the table is empty. Returns how many rows were added.
pub async fn seed_demo_notes(db: &DB) -> Result<usize> {
    let seeded = db
        .call(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
            if count > 0 {
                return Ok(0);
            }

            let tx = conn.transaction()?;
            for (resident_name, author_name, content, date_time) in DEMO_NOTES {
                tx.execute(
                    "INSERT INTO notes (resident_name, author_name, content, date_time) VALUES (?, ?, ?, ?)",
                    params![resident_name, author_name, content, date_time],
                )?;
            }
            tx.commit()?;

            Ok(DEMO_NOTES.len())
        })
        .await?;

    if seeded > 0 {
        tracing::info!("seeded {seeded} demo notes");
    }

    Ok(seeded)
}
