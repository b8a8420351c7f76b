use axum::extract::FromRef;

use crate::{browser::SharedNoteApi, db::DB, shared::views::Views};

#[derive(FromRef, Clone)]
pub struct AppState {
    pub conn: DB,
    pub views: Views,
    pub notes: SharedNoteApi,
}
