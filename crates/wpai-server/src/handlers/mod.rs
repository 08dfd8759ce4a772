//! HTTP handler modules for the wpai API.
//!
//! Each sub-module implements thin handlers that parse requests, acquire the
//! service lock, delegate to [`SiteService`](crate::service::SiteService), and
//! return JSON responses. No business logic lives in handlers.

pub mod blueprint;
pub mod capabilities;
pub mod content;
pub mod plugins;
pub mod site;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON request body that tolerates an empty body and a missing
/// content type.
///
/// An empty body decodes as `T::default()`, so absent required fields are
/// reported by the operation as `missing_field`. Malformed JSON is a
/// `validation_error`.
#[derive(Debug, Clone, Default)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload(T::default()));
        }
        serde_json::from_slice(&bytes)
            .map(Payload)
            .map_err(|e| ApiError::Validation(format!("invalid JSON body: {}", e)))
    }
}
