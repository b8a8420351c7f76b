use std::sync::Arc;

use axum::{middleware, response::IntoResponse, routing::get, Json, Router};
use minijinja::{Environment, UndefinedBehavior};
use rand::Rng;
use serde_json::json;
use tower_http::services::ServeDir;

use crate::{
    browser::{self, LocalNotes, SharedNoteApi},
    config::config,
    db::DB,
    errors::{self, on_error, Error},
    notes,
    shared::views::Views,
    state::AppState,
};

pub struct AppParams {
    pub db: DB,
    pub notes: SharedNoteApi,
    pub static_dir: String,
}

impl AppParams {
    /// Browser and store share the process and the connection.
    pub fn local(db: DB) -> Self {
        Self {
            notes: Arc::new(LocalNotes::new(db.clone())),
            db,
            static_dir: config().static_dir.clone(),
        }
    }
}

pub fn create(
    AppParams {
        db,
        notes: note_api,
        static_dir,
    }: AppParams,
) -> errors::Result<Router> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    browser::add_templates(&mut env)?;

    let state = AppState {
        conn: db,
        views: Views::new(env),
        notes: note_api,
    };

    let app = Router::new()
        .route("/__version__", get(version))
        .route("/__heartbeat__", get(heartbeat))
        .route("/__lbheartbeat__", get(lbheartbeat))
        .route("/favicon.ico", get(favicon))
        .merge(notes::router(state.clone()))
        .merge(browser::router(state))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(middleware::from_fn(on_error));

    Ok(app)
}

async fn version() -> impl IntoResponse {
    let config = config();
    Json(json!({
        "source" : config.source,
        "version": config.version,
        "commit" : config.git_commit,
        "build"  : config.pipeline_id
    }))
}

async fn heartbeat() -> impl IntoResponse {
    let random: u32 = rand::thread_rng().gen_range(0..=10000);

    Json(json!({
        "status" : "ok",
        "random": random,
    }))
}

async fn lbheartbeat() -> impl IntoResponse {
    ""
}

async fn favicon() -> Error {
    Error::NotFound("Favicon not found.".into())
}
