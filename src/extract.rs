//! Request extractors that report rejections as JSON [Error] responses.
//!
//! axum's own [axum::Json] and [axum::extract::Query] reject malformed input
//! with a plain text body. These wrappers run the same extraction and turn the
//! rejection into an [Error::InvalidRequest] so clients always get a
//! [crate::MessageBody].

use axum::extract::{
    FromRequest, FromRequestParts,
    rejection::{JsonRejection, QueryRejection},
};

use crate::Error;

/// A JSON request body, see [axum::Json].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct AppJson<T>(pub T);

/// Query string parameters, see [axum::extract::Query].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct AppQuery<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected JSON body: {rejection}");
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("rejected query string: {rejection}");
        Error::InvalidRequest(rejection.body_text())
    }
}
