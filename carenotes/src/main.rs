mod app;
mod browser;
mod config;
mod db;
mod errors;
mod extract;
mod notes;
mod shared;
mod state;

use std::sync::Arc;

use app::AppParams;
use browser::{HttpNotes, LocalNotes, SharedNoteApi};
pub use errors::{Error, Result};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::init()?;

    shared::tracing::setup_tracing(config.log_json);

    let db = db::init_db(&config.database_url).await?;
    if config.seed_demo_notes {
        db::seed_demo_notes(&db).await?;
    }

    let notes: SharedNoteApi = match &config.notes_api_url {
        Some(url) => {
            tracing::info!("browser uses the notes API at {url}");
            let client = HttpNotes::new(url.as_str())
                .map_err(|e| Error::Unexpected(format!("failed to build notes client: {e}")))?;
            Arc::new(client)
        }
        None => Arc::new(LocalNotes::new(db.clone())),
    };

    let app = app::create(AppParams {
        db,
        notes,
        static_dir: config.static_dir.clone(),
    })?;
    let app = shared::tracing::add_tracing_layer(app);

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;

    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
