//! Extractors whose rejections render as [`ApiError`] JSON instead of
//! axum's plain-text bodies.

use axum::extract::{FromRequest, FromRequestParts};

use super::ApiError;

/// `Json<T>` that rejects malformed bodies with 400 `{"message": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query<T>` that rejects malformed query strings with 400 `{"message": ...}`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
