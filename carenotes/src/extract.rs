//! Extractors that report malformed input as [`crate::Error`] so every
//! rejection carries the same JSON error body.

use axum::response::IntoResponse;
use axum_macros::{FromRequest, FromRequestParts};
use serde::Serialize;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(crate::Error))]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(crate::Error))]
pub struct Query<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(crate::Error))]
pub struct Path<T>(pub T);

#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(crate::Error))]
pub struct Form<T>(pub T);
