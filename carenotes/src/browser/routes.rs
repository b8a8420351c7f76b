use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::{get, put},
    Router,
};
use axum_htmx::{HxRequest, HxRetarget, HxReswap, SwapOption};
use chrono::{SecondsFormat, Utc};
use minijinja::context;
use serde::Deserialize;

use crate::{
    extract::{Form, Path, Query},
    notes::{NoteId, NoteInput},
    shared::views::Views,
    state::AppState,
};

use super::{Error, NoteApi, NoteBrowser, NoteCard, Result, SharedNoteApi};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(notes_page))
        .route("/browser/notes", get(list_notes).post(add_note))
        .route("/browser/notes/{id}", put(update_note).delete(delete_note))
        .route("/browser/edit", get(edit_note))
        .route("/browser/edit/close", get(close_editor))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct FilterQuery {
    filter: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteForm {
    #[serde(default)]
    resident_name: String,
    #[serde(default)]
    author_name: String,
    #[serde(default)]
    content: String,
    filter: Option<String>,
}

impl NoteForm {
    /// Splits the form into a store input stamped with the current time and the active filter.
    fn into_input(self) -> (NoteInput, Option<String>) {
        let input = NoteInput {
            resident_name: self.resident_name,
            author_name: self.author_name,
            content: self.content,
            date_time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        (input, self.filter)
    }
}

/// The displayed fields of a rendered note card.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditQuery {
    id: Option<String>,
    #[serde(default)]
    resident_name: String,
    #[serde(default)]
    author_name: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    date_time: String,
}

fn parse_id(value: Option<&str>) -> Result<NoteId> {
    let value = value.map(str::trim).unwrap_or_default();
    value
        .parse::<NoteId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::InvalidId(value.to_string()))
}

async fn notes_page(
    view: Views,
    State(api): State<SharedNoteApi>,
    Query(FilterQuery { filter }): Query<FilterQuery>,
) -> Response {
    page(&view, api.as_ref(), filter).await
}

async fn list_notes(
    HxRequest(htmx): HxRequest,
    view: Views,
    State(api): State<SharedNoteApi>,
    Query(FilterQuery { filter }): Query<FilterQuery>,
) -> Response {
    if !htmx {
        return page(&view, api.as_ref(), filter).await;
    }
    reload(&view, api.as_ref(), filter, false).await
}

async fn add_note(view: Views, State(api): State<SharedNoteApi>, Form(form): Form<NoteForm>) -> Response {
    let (input, filter) = form.into_input();

    match api.create(input).await {
        Ok(note) => {
            tracing::info!("browser added note {}", note.id);
            reload(&view, api.as_ref(), filter, false).await
        }
        Err(err) => alert(&view, err),
    }
}

async fn edit_note(view: Views, Query(query): Query<EditQuery>) -> Response {
    let id = match parse_id(query.id.as_deref()) {
        Ok(id) => id,
        Err(err) => return alert(&view, err),
    };

    let note = NoteCard {
        id,
        resident_name: query.resident_name,
        author_name: query.author_name,
        content: query.content,
        date_time: query.date_time,
    };

    view.response("note-edit.html", context! { note => note })
}

async fn close_editor() -> Html<&'static str> {
    Html("")
}

async fn update_note(
    view: Views,
    State(api): State<SharedNoteApi>,
    Path(id): Path<String>,
    Form(form): Form<NoteForm>,
) -> Response {
    let id = match parse_id(Some(&id)) {
        Ok(id) => id,
        Err(err) => return alert(&view, err),
    };
    let (input, filter) = form.into_input();

    match api.update(id, input).await {
        Ok(_) => {
            tracing::info!("browser updated note {id}");
            reload(&view, api.as_ref(), filter, true).await
        }
        Err(err) => alert(&view, err),
    }
}

async fn delete_note(
    view: Views,
    State(api): State<SharedNoteApi>,
    Path(id): Path<String>,
    Query(FilterQuery { filter }): Query<FilterQuery>,
) -> Response {
    let id = match parse_id(Some(&id)) {
        Ok(id) => id,
        Err(err) => return alert(&view, err),
    };

    match api.delete(id).await {
        Ok(message) => {
            tracing::info!("{message}");
            reload(&view, api.as_ref(), filter, false).await
        }
        Err(err) => alert(&view, err),
    }
}

async fn page(view: &Views, api: &dyn NoteApi, filter: Option<String>) -> Response {
    let browser = match NoteBrowser::load(api, filter.clone()).await {
        Ok(browser) => browser,
        Err(err) => {
            tracing::error!("{err:?}");
            NoteBrowser::new(filter).with_alert(err.user_message())
        }
    };

    view.response("notes.html", context! { browser => browser })
}

/// Re-fetches the list and renders it together with out-of-band filter options.
async fn reload(view: &Views, api: &dyn NoteApi, filter: Option<String>, close_editor: bool) -> Response {
    match NoteBrowser::load(api, filter).await {
        Ok(browser) => view.response(
            "notes.html#list",
            context! { browser => browser, oob => true, close_editor => close_editor },
        ),
        Err(err) => alert(view, err),
    }
}

/// Shows the error in the alert area and leaves the rendered list alone.
fn alert(view: &Views, err: Error) -> Response {
    tracing::error!("{err:?}");
    let browser = NoteBrowser::default().with_alert(err.user_message());

    (
        HxRetarget("#alert".into()),
        HxReswap(SwapOption::InnerHtml),
        view.response("notes.html#alert", context! { browser => browser }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::{TestRequest, TestServer};
    use tokio::net::TcpListener;

    use crate::{
        app::{create, AppParams},
        browser::HttpNotes,
        config::config,
        db::{init_test_db, DB},
        errors::Result,
        notes::{handlers, NoteInput},
    };

    async fn seeded() -> Result<(TestServer, DB)> {
        let db = init_test_db().await?;
        for (resident, content) in [
            ("Alice Johnson", "Medication administered as scheduled."),
            ("Bob Williams", "Assisted with physical therapy exercises."),
            ("Alice Johnson", "Ate a full breakfast."),
        ] {
            handlers::create_note(
                NoteInput {
                    resident_name: resident.into(),
                    author_name: "Nurse Smith".into(),
                    content: content.into(),
                    date_time: "2024-09-17T10:30:00Z".into(),
                },
                &db,
            )
            .await?;
        }

        let server = crate::tests::test_server(db.clone()).await?;
        Ok((server, db))
    }

    /// A browser whose notes service refuses connections.
    async fn offline() -> Result<TestServer> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let notes = HttpNotes::new(format!("http://{addr}")).unwrap();
        let app = create(AppParams {
            db: init_test_db().await?,
            notes: Arc::new(notes),
            static_dir: config().static_dir.clone(),
        })?;

        Ok(TestServer::new(app).unwrap())
    }

    fn htmx(request: TestRequest) -> TestRequest {
        request.add_header(HeaderName::from_static("hx-request"), HeaderValue::from_static("true"))
    }

    #[tokio::test]
    async fn page_lists_notes_and_residents() -> Result<()> {
        let (server, _) = seeded().await?;

        let response = server.get("/").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let html = response.text();
        assert!(html.contains("<title>Care Notes</title>"));
        assert!(html.contains("Medication administered as scheduled."));
        assert!(html.contains("Assisted with physical therapy exercises."));
        assert!(html.contains(r#"<option value="" selected>All Residents</option>"#));
        assert_eq!(html.matches(r#"<option value="Alice Johnson""#).count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn filtered_list_is_a_fragment() -> Result<()> {
        let (server, _) = seeded().await?;

        let response = htmx(server.get("/browser/notes").add_query_param("filter", "Bob Williams")).await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let html = response.text();
        assert!(!html.contains("<title>"));
        assert!(html.contains("Assisted with physical therapy exercises."));
        assert!(!html.contains("Medication administered as scheduled."));
        assert!(html.contains(r#"hx-swap-oob="true""#));
        assert!(html.contains(r#"<option value="Bob Williams" selected>Bob Williams</option>"#));
        assert!(!html.contains(r#"<option value="Alice Johnson""#));
        Ok(())
    }

    #[tokio::test]
    async fn plain_navigation_to_list_gets_the_page() -> Result<()> {
        let (server, _) = seeded().await?;

        let response = server.get("/browser/notes").await;
        assert!(response.text().contains("<title>Care Notes</title>"));
        Ok(())
    }

    #[tokio::test]
    async fn add_creates_and_reloads() -> Result<()> {
        let (server, db) = seeded().await?;

        let response = htmx(server.post("/browser/notes").form(&[
            ("residentName", "Carol King"),
            ("authorName", "Dr. Brown"),
            ("content", "Blood pressure normal."),
            ("filter", ""),
        ]))
        .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("Blood pressure normal."));

        let notes = handlers::find_notes(Some("Carol King".into()), &db).await?;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, 4);
        assert!(chrono::DateTime::parse_from_rfc3339(&notes[0].date_time).is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn add_with_missing_author_shows_alert() -> Result<()> {
        let (server, db) = seeded().await?;

        let response = htmx(server.post("/browser/notes").form(&[
            ("residentName", "Carol King"),
            ("content", "Blood pressure normal."),
        ]))
        .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.headers().get("hx-retarget").unwrap(), "#alert");
        assert!(response.text().contains("authorName must not be empty"));

        assert_eq!(handlers::find_notes(None, &db).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn edit_form_uses_displayed_fields() -> Result<()> {
        let (server, _) = seeded().await?;

        let response = htmx(
            server
                .get("/browser/edit")
                .add_query_param("id", "2")
                .add_query_param("residentName", "Bob Williams")
                .add_query_param("authorName", "Nurse Smith")
                .add_query_param("content", "Assisted with physical therapy exercises."),
        )
        .await;

        let html = response.text();
        assert!(html.contains(r#"hx-put="/browser/notes/2""#));
        assert!(html.contains(r#"value="Bob Williams""#));
        assert!(html.contains("Assisted with physical therapy exercises."));
        Ok(())
    }

    #[tokio::test]
    async fn update_saves_and_closes_editor() -> Result<()> {
        let (server, db) = seeded().await?;

        let response = htmx(server.put("/browser/notes/2").form(&[
            ("residentName", "Bob Williams"),
            ("authorName", "Dr. Brown"),
            ("content", "Walked twice around the garden."),
            ("filter", "Bob Williams"),
        ]))
        .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let html = response.text();
        assert!(html.contains("Walked twice around the garden."));
        assert!(html.contains(r#"<div id="edit-panel" hx-swap-oob="true"></div>"#));

        let notes = handlers::find_notes(None, &db).await?;
        assert_eq!(notes[1].author_name, "Dr. Brown");
        assert_ne!(notes[1].date_time, "2024-09-17T10:30:00Z");
        assert_eq!(notes[0].content, "Medication administered as scheduled.");
        Ok(())
    }

    #[tokio::test]
    async fn delete_reloads_without_the_note() -> Result<()> {
        let (server, db) = seeded().await?;

        let response = htmx(server.delete("/browser/notes/1")).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(!response.text().contains("Medication administered as scheduled."));

        assert_eq!(handlers::find_notes(None, &db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn delete_failures_only_touch_the_alert() -> Result<()> {
        let (server, db) = seeded().await?;

        let response = htmx(server.delete("/browser/notes/99")).await;
        assert_eq!(response.headers().get("hx-retarget").unwrap(), "#alert");
        assert_eq!(response.headers().get("hx-reswap").unwrap(), "innerHTML");
        let html = response.text();
        assert!(html.contains("Note with ID 99 not found."));
        assert!(!html.contains("<ul"));

        let response = htmx(server.delete("/browser/notes/abc")).await;
        assert!(response.text().contains("Invalid note ID: abc"));

        assert_eq!(handlers::find_notes(None, &db).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_service_shows_alert_on_page() -> Result<()> {
        let server = offline().await?;

        let response = server.get("/").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let html = response.text();
        assert!(html.contains(
            r#"<div id="alert" role="alert"><p class="alert">Could not reach the notes service. Please try again.</p></div>"#
        ));
        assert!(html.contains("No notes found."));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_service_leaves_list_alone() -> Result<()> {
        let server = offline().await?;

        let response = htmx(server.delete("/browser/notes/1")).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.headers().get("hx-retarget").unwrap(), "#alert");
        assert_eq!(response.headers().get("hx-reswap").unwrap(), "innerHTML");

        let html = response.text();
        assert!(html.contains("Could not reach the notes service. Please try again."));
        assert!(!html.contains("<ul"));

        let response = htmx(server.get("/browser/notes")).await;
        assert_eq!(response.headers().get("hx-retarget").unwrap(), "#alert");
        assert!(!response.text().contains("<ul"));
        Ok(())
    }

    #[tokio::test]
    async fn close_editor_is_empty() -> Result<()> {
        let (server, _) = seeded().await?;

        let response = htmx(server.get("/browser/edit/close")).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().is_empty());
        Ok(())
    }
}
