use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::notes::{DeleteNoteResponse, Note, NoteId, NoteInput};

use super::{Error, NoteApi, Result};

/// Talks to a notes store over its JSON HTTP API.
#[derive(Clone, Debug)]
pub struct HttpNotes {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpNotes {
    pub fn new(base_url: impl Into<String>) -> reqwest::Result<Self> {
        let client = Client::builder().user_agent("carenotes-browser").build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Turns error statuses into [`Error::Api`] carrying the store's message.
async fn checked(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

/// Reads a successful body. A reply that is not the expected JSON is [`Error::Decode`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = checked(response).await?.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl NoteApi for HttpNotes {
    async fn list(&self, resident_name: Option<String>) -> Result<Vec<Value>> {
        let mut request = self.client.get(self.url("/notes/list"));
        if let Some(resident_name) = resident_name {
            request = request.query(&[("residentName", resident_name)]);
        }

        decode(request.send().await?).await
    }

    async fn create(&self, input: NoteInput) -> Result<Note> {
        let response = self.client.post(self.url("/notes/create")).json(&input).send().await?;
        decode(response).await
    }

    async fn update(&self, id: NoteId, input: NoteInput) -> Result<Note> {
        let response = self
            .client
            .put(self.url(&format!("/notes/update/{id}")))
            .json(&input)
            .send()
            .await?;
        decode(response).await
    }

    async fn delete(&self, id: NoteId) -> Result<String> {
        let response = self.client.delete(self.url(&format!("/notes/delete/{id}"))).send().await?;
        let body = decode::<DeleteNoteResponse>(response).await?;
        Ok(body.message)
    }
}
