pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid_id")]
    InvalidId(String),

    /// The store answered with an error status.
    #[error("api")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] crate::Error),
}

impl Error {
    /// Text for the alert area. Details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidId(value) if value.is_empty() => "Missing note ID.".into(),
            Self::InvalidId(value) => format!("Invalid note ID: {value}"),
            Self::Api { message, .. } => message.clone(),
            Self::Transport(_) => "Could not reach the notes service. Please try again.".into(),
            Self::Decode(_) => "The notes service sent an unexpected response.".into(),
            Self::Store(error) => error.message(),
        }
    }
}
