/// Request extractors that reject with [`ApiError`]
///
/// Axum's stock `Json` and `Path` extractors answer bad input with plain
/// text and a mix of 400/415/422 statuses. These wrappers route every
/// rejection through `ApiError` so clients always receive a 400 with a JSON
/// `message`.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Typed path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
