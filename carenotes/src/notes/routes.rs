use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    db::DB,
    extract::{Json, Path, Query},
    state::AppState,
    Result,
};

use super::{handlers, DeleteNoteResponse, ListNotesQuery, Note, NoteId, NoteInput};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/notes/list", get(list_notes))
        .route("/notes/create", post(create_note))
        .route("/notes/update/{id}", put(update_note))
        .route("/notes/delete/{id}", delete(delete_note))
        .with_state(state)
}

async fn list_notes(State(db): State<DB>, Query(query): Query<ListNotesQuery>) -> Result<Json<Vec<Note>>> {
    handlers::find_notes(query.filter(), &db).await.map(Json)
}

async fn create_note(State(db): State<DB>, Json(input): Json<NoteInput>) -> Result<impl IntoResponse> {
    handlers::create_note(input, &db)
        .await
        .map(|note| (StatusCode::CREATED, Json(note)))
}

async fn update_note(
    State(db): State<DB>,
    Path(id): Path<NoteId>,
    Json(input): Json<NoteInput>,
) -> Result<Json<Note>> {
    handlers::update_note(id, input, &db).await.map(Json)
}

async fn delete_note(State(db): State<DB>, Path(id): Path<NoteId>) -> Result<Json<DeleteNoteResponse>> {
    handlers::delete_note(id, &db).await.map(Json)
}
