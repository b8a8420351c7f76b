use std::sync::{Arc, OnceLock};

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
        Request,
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::db;

pub use response::ErrorResponse;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not_found")]
    NotFound(String),

    // validation
    #[error("validation")]
    Validation(String),
    #[error("validation")]
    JsonValidation(#[from] JsonRejection),
    #[error("validation")]
    FormValidation(#[from] FormRejection),
    #[error("validation")]
    QueryValidation(#[from] QueryRejection),
    #[error("validation")]
    PathValidation(#[from] PathRejection),

    #[error(transparent)]
    DB(db::Error),
    #[error(transparent)]
    Template(#[from] minijinja::Error),
    #[error(transparent)]
    Config(#[from] envy::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unexpected")]
    Unexpected(String),
}

impl From<db::Error> for Error {
    fn from(error: db::Error) -> Self {
        match error {
            db::Error::NotFound(msg) => Self::NotFound(msg),
            error => Self::DB(error),
        }
    }
}

impl Error {
    /// The text shown to API callers and browser users for this error.
    pub fn message(&self) -> String {
        ErrorResponse::from(self).message.unwrap_or_default()
    }
}

// Response

macro_rules! error_responses {
    (
        $($name:ident: $code:expr),* $(,)?
    ) => {
        #[derive(Debug, Clone)]
        struct Responses {
            $(
                $name: ErrorResponse,
            )*
        }

        static ERRORS: OnceLock<Responses> = OnceLock::new();

        fn errors() -> &'static Responses {
            ERRORS.get_or_init(|| Responses {
                $(
                    $name: ErrorResponse::new(stringify!($name), $code),
                )*
            })
        }
    };
}

error_responses! {
    not_found: 404,
    validation: 400,
    path_validation: 400,
    query_validation: 400,
    json_validation: 400,
    unexpected: 500
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        let errors = errors();
        match error {
            Error::NotFound(message) => errors.not_found.with_message(message),
            Error::Validation(message) => errors.validation.with_message(message),
            Error::JsonValidation(error) => errors.json_validation.with_message(error.body_text()),
            Error::FormValidation(error) => errors.validation.with_message(error.body_text()),
            Error::QueryValidation(error) => errors.query_validation.with_message(error.body_text()),
            Error::PathValidation(error) => errors.path_validation.with_message(error.body_text()),
            Error::Unexpected(message) => errors.unexpected.with_message(message),
            _ => errors.unexpected.with_message("Internal Server Error"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let error = Arc::new(self);

        let error_res = ErrorResponse::from(error.as_ref());
        let status = error_res.status;

        let mut res = axum::Json(error_res).into_response();
        res.extensions_mut().insert(error);

        *res.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        res
    }
}

pub async fn on_error(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    if let Some(error) = response.extensions().get::<Arc<Error>>() {
        match error.as_ref() {
            Error::NotFound(_)
            | Error::Validation(_)
            | Error::JsonValidation(_)
            | Error::FormValidation(_)
            | Error::QueryValidation(_)
            | Error::PathValidation(_) => tracing::warn!("{:?}", error),
            _ => tracing::error!("{:?}", error),
        }
    }

    response
}

mod response {
    use super::*;

    #[derive(Debug, Serialize, Clone, Default)]
    pub struct ErrorResponse {
        pub error: String,
        pub message: Option<String>,
        pub status: u16,
    }

    impl ErrorResponse {
        pub fn new(error: impl Into<String>, status: u16) -> Self {
            Self {
                error: error.into(),
                status,
                ..Default::default()
            }
        }

        pub fn with_message(&self, message: impl Into<String>) -> Self {
            let mut res = self.clone();
            res.message = Some(message.into());
            res
        }
    }
}
