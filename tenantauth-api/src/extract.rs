/// Request extractors
///
/// [`AppJson`] is `axum::Json` with rejections rendered as [`ApiError`], so a
/// missing field or broken body gets the same `{error, message}` shape as
/// every other failure.

use crate::error::ApiError;
use axum::extract::FromRequest;

/// JSON body extractor with `ApiError` rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);
