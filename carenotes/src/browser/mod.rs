//! The client side of the notes system: fetches notes through [`NoteApi`],
//! renders them as htmx fragments and forwards user actions to the store.

mod api;
mod client;
mod errors;
mod routes;
mod view;

use minijinja::Environment;

pub use api::{LocalNotes, NoteApi, SharedNoteApi};
pub use client::HttpNotes;
pub use errors::{Error, Result};
pub use routes::router;
pub use view::{NoteBrowser, NoteCard};

pub fn add_templates(env: &mut Environment<'static>) -> std::result::Result<(), minijinja::Error> {
    env.add_template("base.html", include_str!("views/base.html"))?;
    env.add_template("notes.html", include_str!("views/notes.html"))?;
    env.add_template("note-edit.html", include_str!("views/note-edit.html"))?;
    env.add_template("resident-filter.html", include_str!("views/resident-filter.html"))?;
    Ok(())
}
